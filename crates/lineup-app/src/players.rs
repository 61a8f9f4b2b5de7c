// Player salary sheet loading.
//
// Reads a daily salary export and an optional separate projections sheet,
// and turns them into the pre-scored records the optimizer consumes. Both
// sheets may carry a header row (`Name,Position,Salary[,Projection]`,
// `Name,Projection`) or be raw headerless exports read by column position.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use lineup_core::{Player, Position};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::DataPaths;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlayerDataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Salary sheet row. Salary stays a string because exports format it as
/// currency (`"$3,500 "`). Extra columns are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerRow {
    Name: String,
    #[serde(alias = "Pos")]
    Position: String,
    Salary: String,
    #[serde(default, alias = "FPPG")]
    Projection: Option<f64>,
}

impl RawPlayerRow {
    /// Headerless export layout: `Pos,Name,FPPG,Played,Game,Salary,Action`.
    fn from_positions(record: &StringRecord) -> Option<Self> {
        let projection = match record.get(2)? {
            "" => None,
            raw => Some(raw.parse::<f64>().ok()?),
        };
        Some(RawPlayerRow {
            Position: record.get(0)?.to_string(),
            Name: record.get(1)?.to_string(),
            Salary: record.get(5)?.to_string(),
            Projection: projection,
        })
    }
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawProjectionRow {
    Name: String,
    #[serde(alias = "FPPG")]
    Projection: f64,
}

impl RawProjectionRow {
    /// Headerless layout: `name,projection`.
    fn from_positions(record: &StringRecord) -> Option<Self> {
        Some(RawProjectionRow {
            Name: record.get(0)?.to_string(),
            Projection: record.get(1)?.parse::<f64>().ok()?,
        })
    }
}

/// A salary-sheet row before projections are attached.
#[derive(Debug, Clone, PartialEq)]
struct SalaryEntry {
    name: String,
    position: Position,
    salary: u32,
    projection: Option<f64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a salary written as `3500`, `$3,500` or `"$3,500 "`.
pub fn clean_salary(raw: &str) -> Option<u32> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    digits.parse().ok()
}

/// Status flag glued onto a name in salary exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    /// `DL` suffix: on the disabled list.
    Disabled,
    /// Trailing `P`: probable starting pitcher.
    Probable,
}

/// Split an export name like `Colby RasmusDL` or `Clayton KershawP` into the
/// bare name and its status flag.
///
/// A suffix only counts when it follows a lowercase letter, so all-caps
/// names and initials are left alone.
pub fn clean_name(raw: &str) -> (String, Option<PlayerStatus>) {
    let name = raw.trim();
    if let Some(rest) = name.strip_suffix("DL").filter(|rest| ends_lowercase(rest)) {
        return (rest.to_string(), Some(PlayerStatus::Disabled));
    }
    if let Some(rest) = name.strip_suffix('P').filter(|rest| ends_lowercase(rest)) {
        return (rest.to_string(), Some(PlayerStatus::Probable));
    }
    (name.to_string(), None)
}

fn ends_lowercase(s: &str) -> bool {
    s.chars().last().is_some_and(char::is_lowercase)
}

/// Case-insensitive key the two sheets are joined on.
fn join_key(name: &str) -> String {
    clean_name(name).0.to_lowercase()
}

/// A first row naming a `Name` column is a header; anything else is data.
fn is_header_row(record: &StringRecord) -> bool {
    record.iter().any(|field| field.eq_ignore_ascii_case("name"))
}

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_salaries_from_reader<R: Read>(rdr: R) -> Result<Vec<SalaryEntry>, csv::Error> {
    let mut reader = csv_reader(rdr);
    let mut headers: Option<StringRecord> = None;
    let mut entries = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping malformed salary row: {}", e);
                continue;
            }
        };
        if index == 0 && is_header_row(&record) {
            headers = Some(record);
            continue;
        }
        let raw = match &headers {
            Some(h) => match record.deserialize::<RawPlayerRow>(Some(h)) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("skipping malformed salary row: {}", e);
                    continue;
                }
            },
            None => match RawPlayerRow::from_positions(&record) {
                Some(raw) => raw,
                None => {
                    warn!(
                        "skipping salary row {}: expected Pos,Name,FPPG,Played,Game,Salary",
                        index + 1
                    );
                    continue;
                }
            },
        };
        if let Some(entry) = salary_entry(raw) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

fn salary_entry(raw: RawPlayerRow) -> Option<SalaryEntry> {
    let (name, status) = clean_name(&raw.Name);
    if name.is_empty() {
        warn!("skipping salary row with empty name");
        return None;
    }
    if status == Some(PlayerStatus::Disabled) {
        warn!("skipping player '{}': on the disabled list", name);
        return None;
    }
    let Some(position) = Position::from_str_pos(&raw.Position) else {
        warn!("skipping player '{}': unknown position '{}'", name, raw.Position);
        return None;
    };
    let Some(salary) = clean_salary(&raw.Salary) else {
        warn!("skipping player '{}': unreadable salary '{}'", name, raw.Salary);
        return None;
    };
    if raw.Projection.is_some_and(|p| !p.is_finite()) {
        warn!("skipping player '{}': non-finite projection", name);
        return None;
    }
    Some(SalaryEntry {
        name,
        position,
        salary,
        projection: raw.Projection,
    })
}

/// Projections keyed by [`join_key`].
fn load_projections_from_reader<R: Read>(rdr: R) -> Result<HashMap<String, f64>, csv::Error> {
    let mut reader = csv_reader(rdr);
    let mut headers: Option<StringRecord> = None;
    let mut map = HashMap::new();
    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping malformed projection row: {}", e);
                continue;
            }
        };
        if index == 0 && is_header_row(&record) {
            headers = Some(record);
            continue;
        }
        let raw = match &headers {
            Some(h) => record.deserialize::<RawProjectionRow>(Some(h)).ok(),
            None => RawProjectionRow::from_positions(&record),
        };
        let Some(raw) = raw else {
            warn!("skipping malformed projection row {}", index + 1);
            continue;
        };
        if !raw.Projection.is_finite() {
            warn!("skipping projection for '{}': non-finite value", raw.Name);
            continue;
        }
        let key = join_key(&raw.Name);
        if map.insert(key, raw.Projection).is_some() {
            warn!("duplicate projection for '{}', using latest value", raw.Name);
        }
    }
    Ok(map)
}

/// Attach projections to salary entries.
///
/// A value from the projections sheet overrides the salary sheet's own
/// column. Players left without any projection are dropped.
fn merge(entries: Vec<SalaryEntry>, projections: Option<&HashMap<String, f64>>) -> Vec<Player> {
    let mut players = Vec::with_capacity(entries.len());
    for entry in entries {
        let value = projections
            .and_then(|m| m.get(&join_key(&entry.name)).copied())
            .or(entry.projection);
        match value {
            Some(value) => players.push(Player::new(entry.name, entry.position, entry.salary, value)),
            None => warn!("dropping player '{}': no projection", entry.name),
        }
    }
    players
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, PlayerDataError> {
    std::fs::File::open(path).map_err(|e| PlayerDataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load scored players from a single salary sheet with a projection column.
pub fn load_players(path: &Path) -> Result<Vec<Player>, PlayerDataError> {
    load_all_from_paths(&DataPaths {
        players: path.display().to_string(),
        projections: None,
    })
}

/// Load a projections sheet, keyed by lowercased bare player name.
pub fn load_projections(path: &Path) -> Result<HashMap<String, f64>, PlayerDataError> {
    load_projections_from_reader(open(path)?).map_err(|e| PlayerDataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the salary sheet and, when configured, the projections sheet, and
/// join them by player name.
pub fn load_all_from_paths(paths: &DataPaths) -> Result<Vec<Player>, PlayerDataError> {
    let salary_path = Path::new(&paths.players);
    let entries = load_salaries_from_reader(open(salary_path)?).map_err(|e| {
        PlayerDataError::Csv {
            path: paths.players.clone(),
            source: e,
        }
    })?;

    let projections = match &paths.projections {
        Some(p) => Some(load_projections(Path::new(p))?),
        None => None,
    };

    let read = entries.len();
    let players = merge(entries, projections.as_ref());
    if players.is_empty() {
        return Err(PlayerDataError::Validation(format!(
            "{} produced zero scored players",
            paths.players
        )));
    }
    info!("Read {} salary rows, {} scored players", read, players.len());

    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_formats_are_cleaned() {
        assert_eq!(clean_salary("3500"), Some(3_500));
        assert_eq!(clean_salary("$3,500"), Some(3_500));
        assert_eq!(clean_salary("$3,500 "), Some(3_500));
        assert_eq!(clean_salary(" $10,250"), Some(10_250));
        assert_eq!(clean_salary("n/a"), None);
        assert_eq!(clean_salary(""), None);
        assert_eq!(clean_salary("-$200"), None);
    }

    #[test]
    fn salary_sheet_with_projection_column() {
        let csv_data = "\
Name,Position,Salary,Projection
Gerrit Cole,SP,\"$10,500 \",21.5
Will Smith,C,4200,7.25
Juan Soto,RF,\"$6,100\",10.5";

        let entries = load_salaries_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "Gerrit Cole");
        assert_eq!(entries[0].position, Position::Pitcher);
        assert_eq!(entries[0].salary, 10_500);
        assert_eq!(entries[0].projection, Some(21.5));
        assert_eq!(entries[1].position, Position::Catcher);
        assert_eq!(entries[2].position, Position::Outfield);
        assert_eq!(entries[2].salary, 6_100);
    }

    #[test]
    fn salary_export_headers_and_extra_columns_accepted() {
        let csv_data = "\
Pos,Name,FPPG,Played,Game,Salary,Action
OF,Colby Rasmus,2.3,37,TAM@TOR,\"$3,500 \",Add";

        let entries = load_salaries_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Colby Rasmus");
        assert_eq!(entries[0].position, Position::Outfield);
        assert_eq!(entries[0].salary, 3_500);
        assert_eq!(entries[0].projection, Some(2.3));
    }

    #[test]
    fn bad_rows_are_skipped() {
        let csv_data = "\
Name,Position,Salary,Projection
Good Player,1B,3000,6.0
Designated Hitter,DH,3000,6.0
Bad Salary,2B,lots,6.0
Bad Projection,SS,3000,not-a-number
,3B,3000,6.0
Another Good,3B,2800,5.5";

        let entries = load_salaries_from_reader(csv_data.as_bytes()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Good Player", "Another Good"]);
    }

    #[test]
    fn missing_projection_column_gives_none() {
        let csv_data = "\
Name,Position,Salary
Will Smith,C,4200";

        let entries = load_salaries_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].projection, None);
    }

    #[test]
    fn projections_sheet_overrides_and_fills() {
        let salaries = "\
Name,Position,Salary,Projection
Gerrit Cole,P,10500,21.5
Will Smith,C,4200,
Juan Soto,OF,6100,";
        let projections = "\
Name,Projection
Gerrit Cole,25.0
Will Smith,8.0
Will Smith,9.0";

        let entries = load_salaries_from_reader(salaries.as_bytes()).unwrap();
        let map = load_projections_from_reader(projections.as_bytes()).unwrap();
        assert_eq!(map.len(), 2);

        let players = merge(entries, Some(&map));
        assert_eq!(players.len(), 2, "Juan Soto has no projection and is dropped");
        assert_eq!(players[0].name, "Gerrit Cole");
        assert!((players[0].value - 25.0).abs() < f64::EPSILON);
        assert_eq!(players[1].name, "Will Smith");
        assert!((players[1].value - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_finite_projection_skipped_in_projection_sheet() {
        let projections = "\
Name,Projection
Gerrit Cole,NaN
Will Smith,8.0";
        let map = load_projections_from_reader(projections.as_bytes()).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("will smith"));
    }

    #[test]
    fn export_names_lose_status_suffix() {
        assert_eq!(
            clean_name("Colby RasmusDL"),
            ("Colby Rasmus".to_string(), Some(PlayerStatus::Disabled))
        );
        assert_eq!(
            clean_name("Clayton KershawP"),
            ("Clayton Kershaw".to_string(), Some(PlayerStatus::Probable))
        );
        assert_eq!(clean_name(" Mike Trout "), ("Mike Trout".to_string(), None));
        // Capitals after a space or another capital are part of the name.
        assert_eq!(clean_name("J.P"), ("J.P".to_string(), None));
        assert_eq!(clean_name("Smith DL"), ("Smith DL".to_string(), None));
    }

    #[test]
    fn headerless_export_read_by_column_position() {
        let csv_data = "\
OF,Colby RasmusDL,2.3,37,TAM@TOR,\"$3,500 \",Add
P,Clayton KershawP,21.4,20,LAD@SF,\"$11,200 \",Add
SS,Jose Reyes,2.9,78,TAM@TOR,\"$3,600 \",Add
2B,Short Row,3.0";

        let entries = load_salaries_from_reader(csv_data.as_bytes()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Clayton Kershaw", "Jose Reyes"], "DL player and short row skipped");
        assert_eq!(entries[0].position, Position::Pitcher);
        assert_eq!(entries[0].salary, 11_200);
        assert_eq!(entries[0].projection, Some(21.4));
        assert_eq!(entries[1].salary, 3_600);
    }

    #[test]
    fn headered_export_names_are_cleaned_too() {
        let csv_data = "\
Pos,Name,FPPG,Played,Game,Salary,Action
OF,Colby RasmusDL,2.3,37,TAM@TOR,\"$3,500 \",Add
OF,Desmond JenningsP,2.1,80,TAM@TOR,\"$2,900 \",Add";

        let entries = load_salaries_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Desmond Jennings");
    }

    #[test]
    fn headerless_projections_join_case_insensitively() {
        let salaries = "\
P,Clayton KershawP,21.4,20,LAD@SF,\"$11,200 \",Add
C,Jose Molina,1.2,50,TAM@TOR,\"$2,100 \",Add";
        let projections = "\
clayton kershaw,24.0
JOSE MOLINA,2.4
not a number,abc";

        let entries = load_salaries_from_reader(salaries.as_bytes()).unwrap();
        let map = load_projections_from_reader(projections.as_bytes()).unwrap();
        assert_eq!(map.len(), 2);

        let players = merge(entries, Some(&map));
        assert_eq!(players[0].name, "Clayton Kershaw");
        assert!((players[0].value - 24.0).abs() < f64::EPSILON);
        assert_eq!(players[1].name, "Jose Molina");
        assert!((players[1].value - 2.4).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_players(Path::new("/nonexistent/players.csv")).unwrap_err();
        assert!(matches!(err, PlayerDataError::Io { .. }));
    }
}
