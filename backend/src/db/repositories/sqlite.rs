//! Read-only SQLite repository.
//!
//! The store is opened once with `SQLITE_OPEN_READ_ONLY`, validated, and then
//! queried through the resolved [`SchemaMap`] for the rest of the process.

use parking_lot::Mutex;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};

use crate::db::repository::{CatalogueRepository, ErrorContext, RepositoryError, RepositoryResult};
use crate::db::schema::{self, dso, stars, visibility, SchemaMap, SchemaSource};
use crate::models::{parse_flag, DsoRecord, Month, OptimalSlot, StarRecord, VisibilityHour};

/// SQLite-backed catalogue repository.
#[derive(Debug)]
pub struct SqliteRepository {
    conn: Mutex<Connection>,
    schema: SchemaMap,
    path: PathBuf,
}

impl SqliteRepository {
    /// Open the store read-only and validate its schema.
    ///
    /// # Errors
    /// * `RepositoryError::DatabaseNotFound` if `path` does not exist
    /// * `RepositoryError::SchemaMismatch` if required tables/columns are missing
    pub fn open<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RepositoryError::database_not_found(path));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            RepositoryError::ConnectionError {
                message: e.to_string(),
                context: ErrorContext::new("open").with_details(path.display().to_string()),
            }
        })?;

        log::info!("Opened catalogue store {}", path.display());
        Self::from_connection(conn, path)
    }

    /// Wrap an already open connection, validating its schema.
    pub fn from_connection<P: Into<PathBuf>>(conn: Connection, path: P) -> RepositoryResult<Self> {
        let schema = schema::validate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            schema,
            path: path.into(),
        })
    }

    /// Resolved column mapping.
    pub fn schema(&self) -> &SchemaMap {
        &self.schema
    }

    /// Path the store was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SchemaSource for Connection {
    fn find_table(&self, name: &str) -> RepositoryResult<Option<String>> {
        let found = self
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND lower(name) = lower(?1)",
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(found)
    }

    fn table_columns(&self, table: &str) -> RepositoryResult<Vec<String>> {
        let sql = format!("PRAGMA table_info({})", schema::quote_identifier(table));
        let mut stmt = self.prepare(&sql)?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }
}

/// Read any cell as text; NULL becomes the empty string.
fn text_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    })
}

fn optional_text_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        _ => Some(text_at(row, idx)?),
    })
}

fn flag_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<bool> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => false,
        ValueRef::Integer(i) => i != 0,
        ValueRef::Real(f) => f != 0.0,
        ValueRef::Text(t) | ValueRef::Blob(t) => parse_flag(&String::from_utf8_lossy(t)),
    })
}

impl CatalogueRepository for SqliteRepository {
    fn health_check(&self) -> RepositoryResult<bool> {
        let conn = self.conn.lock();
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(one == 1)
    }

    fn available_months(&self) -> RepositoryResult<Vec<Month>> {
        let v = &self.schema.visibility;
        let month = v.select_expr("v", visibility::MONTH);
        let sql = format!(
            "SELECT DISTINCT CAST({month} AS INTEGER) AS month
             FROM {table} v
             WHERE CAST({month} AS INTEGER) BETWEEN 1 AND 12
             ORDER BY 1",
            month = month,
            table = v.quoted_table(),
        );

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let months = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepositoryError::from(e).with_operation("available_months"))?;

        Ok(months
            .into_iter()
            .filter_map(|m| u8::try_from(m).ok().and_then(Month::new))
            .collect())
    }

    fn optimal_slots(&self, month: Month) -> RepositoryResult<Vec<OptimalSlot>> {
        let v = &self.schema.visibility;
        let bucketed = v.has_column(visibility::HOUR);
        let hour = if bucketed {
            format!("CAST({} AS INTEGER)", v.select_expr("v", visibility::HOUR))
        } else {
            "NULL".to_string()
        };
        let sql = format!(
            "SELECT {constellation}, {hour}
             FROM {table} v
             WHERE CAST({month} AS INTEGER) = ?1
               AND CAST({optimal} AS INTEGER) = 1",
            constellation = v.select_expr("v", visibility::CONSTELLATION),
            hour = hour,
            table = v.quoted_table(),
            month = v.select_expr("v", visibility::MONTH),
            optimal = v.select_expr("v", visibility::OPTIMAL),
        );

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let slots = stmt
            .query_map(params![i64::from(month.value())], |row| {
                Ok(OptimalSlot {
                    constellation: text_at(row, 0)?,
                    hour: if bucketed {
                        VisibilityHour::Recorded(row.get::<_, Option<i64>>(1)?)
                    } else {
                        VisibilityHour::Unbucketed
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepositoryError::from(e).with_operation("optimal_slots"))?;

        log::debug!(
            "{} optimal visibility rows for {}",
            slots.len(),
            month.name()
        );
        Ok(slots)
    }

    fn dso_records(&self) -> RepositoryResult<Vec<DsoRecord>> {
        let d = &self.schema.dso;
        let sql = format!(
            "SELECT {code}, {kind}, {name}, {notes}, {constellation}, {catalogue}, {tlao}
             FROM {table} d",
            code = d.select_expr("d", dso::CODE),
            kind = d.select_expr("d", dso::TYPE),
            name = d.select_expr("d", dso::NAME),
            notes = d.select_expr("d", dso::NOTES),
            constellation = d.select_expr("d", dso::CONSTELLATION),
            catalogue = d.select_expr("d", dso::CATALOGUE),
            tlao = d.select_expr("d", dso::TURN_LEFT_AT_ORION),
            table = d.quoted_table(),
        );

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], |row| {
                Ok(DsoRecord {
                    code: text_at(row, 0)?,
                    object_type: text_at(row, 1)?,
                    name: text_at(row, 2)?,
                    notes: text_at(row, 3)?,
                    constellation: text_at(row, 4)?,
                    catalogue_label: optional_text_at(row, 5)?,
                    turn_left_at_orion: flag_at(row, 6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepositoryError::from(e).with_operation("dso_records"))?;
        Ok(records)
    }

    fn star_records(&self) -> RepositoryResult<Vec<StarRecord>> {
        let s = &self.schema.stars;
        let sql = format!(
            "SELECT {code}, {kind}, {name}, {count}, {notes}, {constellation}
             FROM {table} s",
            code = s.select_expr("s", stars::CODE),
            kind = s.select_expr("s", stars::TYPE),
            name = s.select_expr("s", stars::NAME),
            count = s.select_expr("s", stars::STARS),
            notes = s.select_expr("s", stars::NOTES),
            constellation = s.select_expr("s", stars::CONSTELLATION),
            table = s.quoted_table(),
        );

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], |row| {
                Ok(StarRecord {
                    code: text_at(row, 0)?,
                    star_type: text_at(row, 1)?,
                    name: text_at(row, 2)?,
                    stars: text_at(row, 3)?,
                    notes: text_at(row, 4)?,
                    constellation: text_at(row, 5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepositoryError::from(e).with_operation("star_records"))?;
        Ok(records)
    }
}
