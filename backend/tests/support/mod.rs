#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;
use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A catalogue file on disk, removed when dropped.
pub struct CatalogueFixture {
    _dir: TempDir,
    path: PathBuf,
}

impl CatalogueFixture {
    /// Create `DSO.db` in a fresh temp dir and run `sql` against it.
    pub fn with_sql(sql: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("DSO.db");
        let conn = Connection::open(&path).expect("create sqlite file");
        conn.execute_batch(sql).expect("seed catalogue");
        Self { _dir: dir, path }
    }

    /// The small January/July catalogue most tests use.
    pub fn standard() -> Self {
        Self::with_sql(STANDARD_CATALOGUE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Orion, Taurus and Canes Venatici are optimal in January (hours 1, 2, 3);
/// Lyra is listed for January but not optimal, and is optimal in July.
pub const STANDARD_CATALOGUE: &str = "
CREATE TABLE DSO (Code TEXT, Name TEXT, Type TEXT, Notes TEXT, Constellation TEXT, TurnLeftAtOrion INTEGER);
CREATE TABLE Visibility (Constellation TEXT, Month INTEGER, Optimal INTEGER, Hour INTEGER);
CREATE TABLE Stars (Code TEXT, Name TEXT, Type TEXT, Constellation TEXT, Stars INTEGER, Notes TEXT);

INSERT INTO DSO VALUES ('M42', 'Orion Nebula', 'Nebula', 'Naked eye, sword of Orion', 'Orion', 1);
INSERT INTO DSO VALUES ('M1', 'Crab Nebula', 'Supernova Remnant', 'Faint', 'Taurus', 1);
INSERT INTO DSO VALUES ('C41', 'Hyades', 'Open Cluster', 'Very large', 'Taurus', 0);
INSERT INTO DSO VALUES ('NGC 1981', 'Coal Car Cluster', 'Open Cluster', '', 'Orion', 0);
INSERT INTO DSO VALUES ('M57', 'Ring Nebula', 'Planetary Nebula', 'Smoke ring', 'Lyra', 1);

INSERT INTO Visibility VALUES ('Orion', 1, 1, 1);
INSERT INTO Visibility VALUES ('Taurus', 1, 1, 2);
INSERT INTO Visibility VALUES ('Canes Venatici', 1, 1, 3);
INSERT INTO Visibility VALUES ('Lyra', 1, 0, 4);
INSERT INTO Visibility VALUES ('Lyra', 7, 1, 1);

INSERT INTO Stars VALUES ('Bet Ori', 'Rigel', 'Double Star', 'Orion', 2, 'Blue-white pair');
INSERT INTO Stars VALUES ('Alp Ori', 'Betelgeuse', 'Red Giant', 'Orion', 1, NULL);
INSERT INTO Stars VALUES ('Alp CVn', 'Cor Caroli', 'double star', 'Canes Venatici', 2, 'Gold and lilac');
INSERT INTO Stars VALUES ('Alp Lyr', 'Vega', NULL, 'Lyra', 1, '');
";
