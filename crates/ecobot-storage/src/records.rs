//! Environmental record repository.
//!
//! Read queries mirror what the dashboard and data explorer ask of the hosted
//! table: optional type filter, case-insensitive location search, and one of
//! four sort orders. Location and status ordering run in Rust on top of the
//! newest-first SQL order.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rusqlite::types::ToSql;
use tracing::{debug, info};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use ecobot_core::error::EcobotError;
use ecobot_core::types::{EnvironmentalRecord, RecordStatus, RecordType};

use crate::db::Database;

/// Sort order for record queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordSort {
    /// Newest first.
    #[default]
    RecordedAt,
    /// Location name, ascending.
    Location,
    /// Measured value, descending.
    Value,
    /// Severity, good first.
    Status,
}

impl FromStr for RecordSort {
    type Err = EcobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recorded_at" | "data" | "recente" => Ok(RecordSort::RecordedAt),
            "location" | "local" => Ok(RecordSort::Location),
            "value" | "valor" => Ok(RecordSort::Value),
            "status" => Ok(RecordSort::Status),
            other => Err(EcobotError::InvalidRecord(format!(
                "unknown sort key: {}",
                other
            ))),
        }
    }
}

/// Filters for [`RecordStore::query_records`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordQuery {
    /// `None` returns every type.
    pub record_type: Option<RecordType>,
    /// Case-insensitive substring of `location`. Empty matches everything.
    pub search_text: Option<String>,
    pub sort: RecordSort,
}

impl RecordQuery {
    pub fn of_type(record_type: RecordType) -> Self {
        Self {
            record_type: Some(record_type),
            ..Self::default()
        }
    }
}

/// Read/write access to the environmental records table.
pub trait RecordStore: Send + Sync {
    fn query_records(&self, query: &RecordQuery) -> Result<Vec<EnvironmentalRecord>, EcobotError>;

    fn insert_record(&self, record: &EnvironmentalRecord) -> Result<(), EcobotError>;
}

/// SQLite-backed [`RecordStore`].
pub struct RecordRepository {
    db: Arc<Database>,
}

impl RecordRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert every record in one transaction. Returns the number written.
    pub fn insert_many(&self, records: &[EnvironmentalRecord]) -> Result<usize, EcobotError> {
        self.db.with_conn(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| EcobotError::Storage(format!("Begin transaction: {}", e)))?;
            for record in records {
                insert_row(&tx, record)?;
            }
            tx.commit()
                .map_err(|e| EcobotError::Storage(format!("Commit: {}", e)))?;
            Ok(records.len())
        })
    }

    /// Load a JSON array of records (upstream field names) into the store.
    pub fn load_seed_file(&self, path: &Path) -> Result<usize, EcobotError> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<EnvironmentalRecord> = serde_json::from_str(&content)?;
        let written = self.insert_many(&records)?;
        info!(count = written, "Seeded records from {}", path.display());
        Ok(written)
    }

    /// Total number of stored records.
    pub fn count(&self) -> Result<u64, EcobotError> {
        self.db.with_conn(|conn| {
            let n: i64 = conn
                .query_row("SELECT COUNT(*) FROM environmental_data", [], |row| {
                    row.get(0)
                })
                .map_err(|e| EcobotError::Storage(format!("Count query: {}", e)))?;
            Ok(n as u64)
        })
    }
}

impl RecordStore for RecordRepository {
    fn query_records(&self, query: &RecordQuery) -> Result<Vec<EnvironmentalRecord>, EcobotError> {
        let mut sql = String::from(
            "SELECT id, type, value, unit, location, status, recorded_at, dia_da_semana
             FROM environmental_data",
        );
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(record_type) = query.record_type {
            sql.push_str(" WHERE type = ?1");
            params.push(Box::new(record_type.as_str()));
        }
        sql.push_str(match query.sort {
            RecordSort::Value => " ORDER BY value DESC, recorded_at DESC",
            _ => " ORDER BY recorded_at DESC",
        });

        let rows = self.db.with_conn(|conn| {
            let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| EcobotError::Storage(format!("Records query prepare: {}", e)))?;
            let rows = stmt
                .query_map(params_refs.as_slice(), |row| Ok(map_record_row(row)))
                .map_err(|e| EcobotError::Storage(format!("Records query: {}", e)))?;

            let mut results = Vec::new();
            for row in rows {
                let r = row.map_err(|e| EcobotError::Storage(e.to_string()))??;
                results.push(r);
            }
            Ok(results)
        })?;

        // Location search runs here rather than in SQL so that accented
        // names fold case the same way the hosted `ilike` does.
        let needle = query
            .search_text
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let mut results: Vec<EnvironmentalRecord> = match needle {
            Some(needle) => rows
                .into_iter()
                .filter(|r| r.location.to_lowercase().contains(&needle))
                .collect(),
            None => rows,
        };

        // Stable sorts keep the newest-first order from SQL as the tiebreak.
        match query.sort {
            RecordSort::Location => {
                results.sort_by_cached_key(|r| location_sort_key(&r.location))
            }
            RecordSort::Status => results.sort_by_key(|r| r.status.severity()),
            RecordSort::RecordedAt | RecordSort::Value => {}
        }

        debug!(
            record_type = ?query.record_type,
            sort = ?query.sort,
            count = results.len(),
            "Records query"
        );
        Ok(results)
    }

    fn insert_record(&self, record: &EnvironmentalRecord) -> Result<(), EcobotError> {
        self.db.with_conn(|conn| insert_row(conn, record))
    }
}

/// Collation key for location names: accents stripped and case folded, then
/// the lowercased name, then the name as stored.
///
/// Orders `Águas Claras`, `belém`, `Brasília` the way a pt-BR reader expects
/// instead of by raw byte value.
pub fn location_sort_key(location: &str) -> (String, String, String) {
    let folded: String = location
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    (folded, location.to_lowercase(), location.to_string())
}

fn insert_row(conn: &rusqlite::Connection, record: &EnvironmentalRecord) -> Result<(), EcobotError> {
    conn.execute(
        "INSERT INTO environmental_data
             (id, type, value, unit, location, status, recorded_at, dia_da_semana)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            record.id.to_string(),
            record.record_type.as_str(),
            record.value,
            record.unit,
            record.location,
            record.status.as_str(),
            record.recorded_at.timestamp(),
            record.day_of_week,
        ],
    )
    .map_err(|e| EcobotError::Storage(format!("Insert record {}: {}", record.id, e)))?;
    Ok(())
}

fn map_record_row(row: &rusqlite::Row<'_>) -> Result<EnvironmentalRecord, EcobotError> {
    let get_err = |e: rusqlite::Error| EcobotError::Storage(e.to_string());

    let id: String = row.get(0).map_err(get_err)?;
    let record_type: String = row.get(1).map_err(get_err)?;
    let value: f64 = row.get(2).map_err(get_err)?;
    let unit: String = row.get(3).map_err(get_err)?;
    let location: String = row.get(4).map_err(get_err)?;
    let status: String = row.get(5).map_err(get_err)?;
    let recorded_at: i64 = row.get(6).map_err(get_err)?;
    let day_of_week: Option<String> = row.get(7).map_err(get_err)?;

    Ok(EnvironmentalRecord {
        id: Uuid::parse_str(&id)
            .map_err(|e| EcobotError::Storage(format!("Invalid record id {}: {}", id, e)))?,
        record_type: record_type.parse()?,
        value,
        unit,
        location,
        status: status.parse::<RecordStatus>()?,
        recorded_at: Utc
            .timestamp_opt(recorded_at, 0)
            .single()
            .ok_or_else(|| EcobotError::Storage(format!("Invalid timestamp {}", recorded_at)))?,
        day_of_week,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 13, 12, 0, 0).unwrap()
    }

    fn make_record(
        record_type: RecordType,
        value: f64,
        location: &str,
        status: RecordStatus,
        hours_ago: i64,
    ) -> EnvironmentalRecord {
        EnvironmentalRecord::new(
            record_type,
            value,
            "u",
            location,
            status,
            base_time() - Duration::hours(hours_ago),
        )
    }

    fn seeded_repo() -> RecordRepository {
        let repo = RecordRepository::new(Arc::new(Database::in_memory().unwrap()));
        repo.insert_many(&[
            make_record(RecordType::Air, 42.0, "São Paulo - Centro", RecordStatus::Good, 3),
            make_record(RecordType::Air, 160.0, "Manaus", RecordStatus::Hazardous, 1),
            make_record(RecordType::Water, 55.0, "Lago Paranoá", RecordStatus::Moderate, 2),
            make_record(RecordType::Water, 25.0, "Rio Tietê", RecordStatus::Poor, 5),
            make_record(RecordType::Temperature, 31.0, "Brasília", RecordStatus::Moderate, 4),
        ])
        .unwrap();
        repo
    }

    fn locations(records: &[EnvironmentalRecord]) -> Vec<&str> {
        records.iter().map(|r| r.location.as_str()).collect()
    }

    #[test]
    fn test_insert_and_count() {
        let repo = seeded_repo();
        assert_eq!(repo.count().unwrap(), 5);
    }

    #[test]
    fn test_default_query_newest_first() {
        let repo = seeded_repo();
        let all = repo.query_records(&RecordQuery::default()).unwrap();
        assert_eq!(
            locations(&all),
            vec![
                "Manaus",
                "Lago Paranoá",
                "São Paulo - Centro",
                "Brasília",
                "Rio Tietê"
            ]
        );
    }

    #[test]
    fn test_type_filter() {
        let repo = seeded_repo();
        let water = repo
            .query_records(&RecordQuery::of_type(RecordType::Water))
            .unwrap();
        assert_eq!(water.len(), 2);
        assert!(water.iter().all(|r| r.record_type == RecordType::Water));
    }

    #[test]
    fn test_location_search_is_case_insensitive_with_accents() {
        let repo = seeded_repo();
        let query = RecordQuery {
            search_text: Some("SÃO".to_string()),
            ..RecordQuery::default()
        };
        let found = repo.query_records(&query).unwrap();
        assert_eq!(locations(&found), vec!["São Paulo - Centro"]);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let repo = seeded_repo();
        let query = RecordQuery {
            search_text: Some("   ".to_string()),
            ..RecordQuery::default()
        };
        assert_eq!(repo.query_records(&query).unwrap().len(), 5);
    }

    #[test]
    fn test_sort_by_value_descending() {
        let repo = seeded_repo();
        let query = RecordQuery {
            sort: RecordSort::Value,
            ..RecordQuery::default()
        };
        let values: Vec<f64> = repo
            .query_records(&query)
            .unwrap()
            .iter()
            .map(|r| r.value)
            .collect();
        assert_eq!(values, vec![160.0, 55.0, 42.0, 31.0, 25.0]);
    }

    #[test]
    fn test_sort_by_status_severity() {
        let repo = seeded_repo();
        let query = RecordQuery {
            sort: RecordSort::Status,
            ..RecordQuery::default()
        };
        let statuses: Vec<RecordStatus> = repo
            .query_records(&query)
            .unwrap()
            .iter()
            .map(|r| r.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                RecordStatus::Good,
                RecordStatus::Moderate,
                RecordStatus::Moderate,
                RecordStatus::Poor,
                RecordStatus::Hazardous
            ]
        );
    }

    #[test]
    fn test_sort_by_location_with_type_filter() {
        let repo = seeded_repo();
        let query = RecordQuery {
            record_type: Some(RecordType::Air),
            sort: RecordSort::Location,
            ..RecordQuery::default()
        };
        let found = repo.query_records(&query).unwrap();
        assert_eq!(locations(&found), vec!["Manaus", "São Paulo - Centro"]);
    }

    #[test]
    fn test_sort_by_location_folds_accents_and_case() {
        let repo = RecordRepository::new(Arc::new(Database::in_memory().unwrap()));
        repo.insert_many(&[
            make_record(RecordType::Air, 40.0, "Brasília", RecordStatus::Good, 1),
            make_record(RecordType::Air, 41.0, "Águas Claras", RecordStatus::Good, 2),
            make_record(RecordType::Air, 42.0, "Curitiba", RecordStatus::Good, 3),
            make_record(RecordType::Air, 43.0, "belém", RecordStatus::Good, 4),
            make_record(RecordType::Air, 44.0, "Óbidos", RecordStatus::Good, 5),
        ])
        .unwrap();
        let query = RecordQuery {
            sort: RecordSort::Location,
            ..RecordQuery::default()
        };
        let found = repo.query_records(&query).unwrap();
        assert_eq!(
            locations(&found),
            vec!["Águas Claras", "belém", "Brasília", "Curitiba", "Óbidos"]
        );
    }

    #[test]
    fn test_sort_by_location_ties_newest_first() {
        let repo = RecordRepository::new(Arc::new(Database::in_memory().unwrap()));
        let older = make_record(RecordType::Water, 60.0, "Recife", RecordStatus::Moderate, 6);
        let newer = make_record(RecordType::Air, 30.0, "Recife", RecordStatus::Good, 1);
        repo.insert_many(&[older.clone(), newer.clone()]).unwrap();
        let query = RecordQuery {
            sort: RecordSort::Location,
            ..RecordQuery::default()
        };
        assert_eq!(repo.query_records(&query).unwrap(), vec![newer, older]);
    }

    #[test]
    fn test_location_sort_key_folds() {
        assert_eq!(location_sort_key("Águas").0, "aguas");
        assert!(location_sort_key("belém") < location_sort_key("Brasília"));
        assert!(location_sort_key("Óbidos") > location_sort_key("Curitiba"));
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let repo = RecordRepository::new(Arc::new(Database::in_memory().unwrap()));
        let record = make_record(RecordType::Water, 71.5, "Rio Negro", RecordStatus::Good, 0);
        repo.insert_record(&record).unwrap();
        let stored = repo.query_records(&RecordQuery::default()).unwrap();
        assert_eq!(stored, vec![record]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let repo = RecordRepository::new(Arc::new(Database::in_memory().unwrap()));
        let record = make_record(RecordType::Air, 1.0, "Recife", RecordStatus::Good, 0);
        repo.insert_record(&record).unwrap();
        assert!(matches!(
            repo.insert_record(&record),
            Err(EcobotError::Storage(_))
        ));
    }

    #[test]
    fn test_load_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "00000000-0000-0000-0000-000000000001", "type": "air", "value": 80.0,
                 "unit": "AQI", "location": "Curitiba", "status": "moderate",
                 "recorded_at": "2025-05-12T09:00:00Z", "dia_da_semana": "Segunda-feira"},
                {"id": "00000000-0000-0000-0000-000000000002", "type": "temperature", "value": 41.0,
                 "unit": "°C", "location": "Cuiabá", "status": "hazardous",
                 "recorded_at": "2025-05-12T15:00:00Z"}
            ]"#,
        )
        .unwrap();

        let repo = RecordRepository::new(Arc::new(Database::in_memory().unwrap()));
        assert_eq!(repo.load_seed_file(&path).unwrap(), 2);
        let temps = repo
            .query_records(&RecordQuery::of_type(RecordType::Temperature))
            .unwrap();
        assert_eq!(temps.len(), 1);
        assert_eq!(temps[0].location, "Cuiabá");
        assert!(temps[0].day_of_week.is_none());
    }

    #[test]
    fn test_load_seed_file_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, "[{").unwrap();
        let repo = RecordRepository::new(Arc::new(Database::in_memory().unwrap()));
        assert!(matches!(
            repo.load_seed_file(&path),
            Err(EcobotError::Serialization(_))
        ));
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("valor".parse::<RecordSort>().unwrap(), RecordSort::Value);
        assert_eq!("LOCATION".parse::<RecordSort>().unwrap(), RecordSort::Location);
        assert_eq!("status".parse::<RecordSort>().unwrap(), RecordSort::Status);
        assert!("altura".parse::<RecordSort>().is_err());
    }
}
