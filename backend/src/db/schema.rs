//! Schema validation and canonical column mapping.
//!
//! The catalogue store is hand-maintained, so table and column names vary in
//! case and spacing ("Constellation", "constellation", "Turn Left At Orion").
//! Validation runs once when the store is opened and produces a [`SchemaMap`]
//! from canonical names to the identifiers actually present in the file.

use std::collections::HashMap;

use super::repository::{RepositoryError, RepositoryResult};

/// Visibility table schema
pub mod visibility {
    pub const TABLE: &str = "Visibility";
    pub const CONSTELLATION: &str = "Constellation";
    pub const MONTH: &str = "Month";
    pub const OPTIMAL: &str = "Optimal";
    /// Observation block (1..=4); optional
    pub const HOUR: &str = "Hour";
}

/// DSO table schema
pub mod dso {
    pub const TABLE: &str = "DSO";
    pub const CODE: &str = "Code";
    pub const NAME: &str = "Name";
    pub const TYPE: &str = "Type";
    pub const NOTES: &str = "Notes";
    pub const CONSTELLATION: &str = "Constellation";
    /// Messier/Caldwell/...; optional, the Code prefix is used when absent
    pub const CATALOGUE: &str = "Catalogue";
    /// "Turn Left at Orion" flag; optional
    pub const TURN_LEFT_AT_ORION: &str = "TurnLeftAtOrion";
}

/// Stars table schema
pub mod stars {
    pub const TABLE: &str = "Stars";
    pub const CODE: &str = "Code";
    pub const NAME: &str = "Name";
    pub const TYPE: &str = "Type";
    pub const CONSTELLATION: &str = "Constellation";
    pub const STARS: &str = "Stars";
    pub const NOTES: &str = "Notes";
}

/// Optional column with the alternative spellings it may appear under.
#[derive(Debug, Clone, Copy)]
pub struct OptionalColumn {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

/// Expected shape of one table.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [OptionalColumn],
}

pub const DSO_SPEC: TableSpec = TableSpec {
    name: dso::TABLE,
    required: &[
        dso::CODE,
        dso::NAME,
        dso::TYPE,
        dso::NOTES,
        dso::CONSTELLATION,
    ],
    optional: &[
        OptionalColumn {
            canonical: dso::CATALOGUE,
            aliases: &[],
        },
        OptionalColumn {
            canonical: dso::TURN_LEFT_AT_ORION,
            aliases: &["TLAO"],
        },
    ],
};

pub const VISIBILITY_SPEC: TableSpec = TableSpec {
    name: visibility::TABLE,
    required: &[
        visibility::CONSTELLATION,
        visibility::MONTH,
        visibility::OPTIMAL,
    ],
    optional: &[OptionalColumn {
        canonical: visibility::HOUR,
        aliases: &[],
    }],
};

pub const STARS_SPEC: TableSpec = TableSpec {
    name: stars::TABLE,
    required: &[
        stars::CODE,
        stars::NAME,
        stars::TYPE,
        stars::CONSTELLATION,
        stars::STARS,
        stars::NOTES,
    ],
    optional: &[],
};

/// Case- and space-insensitive form of an identifier.
pub fn normalize_identifier(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Wrap an identifier in double quotes for interpolation into SQL.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Introspection needed by [`validate`].
pub trait SchemaSource {
    /// Actual name of the table matching `name` case-insensitively.
    fn find_table(&self, name: &str) -> RepositoryResult<Option<String>>;

    /// Column names of an existing table, in declaration order.
    fn table_columns(&self, table: &str) -> RepositoryResult<Vec<String>>;
}

/// A table whose canonical columns have been resolved to actual identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTable {
    table: String,
    columns: HashMap<&'static str, String>,
}

impl ResolvedTable {
    /// Actual table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Actual name of a canonical column, `None` for absent optional columns.
    pub fn column(&self, canonical: &str) -> Option<&str> {
        self.columns.get(canonical).map(String::as_str)
    }

    pub fn has_column(&self, canonical: &str) -> bool {
        self.columns.contains_key(canonical)
    }

    /// Quoted table name for SQL.
    pub fn quoted_table(&self) -> String {
        quote_identifier(&self.table)
    }

    /// `alias."column"` for a resolved column, `NULL` when it is absent.
    pub fn select_expr(&self, alias: &str, canonical: &str) -> String {
        match self.column(canonical) {
            Some(actual) => format!("{}.{}", alias, quote_identifier(actual)),
            None => "NULL".to_string(),
        }
    }
}

/// Canonical column-name table for the whole store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMap {
    pub dso: ResolvedTable,
    pub visibility: ResolvedTable,
    pub stars: ResolvedTable,
}

/// Check every required table and column, collecting all problems.
pub fn validate<S: SchemaSource + ?Sized>(source: &S) -> RepositoryResult<SchemaMap> {
    let mut problems = Vec::new();

    let dso = resolve_table(source, &DSO_SPEC, &mut problems)?;
    let visibility = resolve_table(source, &VISIBILITY_SPEC, &mut problems)?;
    let stars = resolve_table(source, &STARS_SPEC, &mut problems)?;

    match (dso, visibility, stars) {
        (Some(dso), Some(visibility), Some(stars)) if problems.is_empty() => {
            log::debug!(
                "Schema resolved: DSO={:?}, Visibility={:?}, Stars={:?}",
                dso.columns,
                visibility.columns,
                stars.columns
            );
            Ok(SchemaMap {
                dso,
                visibility,
                stars,
            })
        }
        _ => Err(RepositoryError::schema_mismatch(problems)),
    }
}

fn resolve_table<S: SchemaSource + ?Sized>(
    source: &S,
    spec: &TableSpec,
    problems: &mut Vec<String>,
) -> RepositoryResult<Option<ResolvedTable>> {
    let Some(table) = source.find_table(spec.name)? else {
        problems.push(format!("Missing table: {}", spec.name));
        return Ok(None);
    };

    let actual_columns = source.table_columns(&table)?;
    let lookup: HashMap<String, &String> = actual_columns
        .iter()
        .map(|c| (normalize_identifier(c), c))
        .collect();

    let mut columns = HashMap::new();
    for &required in spec.required {
        match lookup.get(&normalize_identifier(required)) {
            Some(actual) => {
                columns.insert(required, (*actual).clone());
            }
            None => problems.push(format!(
                "Missing column: \"{}\" in table {}",
                required, spec.name
            )),
        }
    }

    for optional in spec.optional {
        let found = std::iter::once(optional.canonical)
            .chain(optional.aliases.iter().copied())
            .find_map(|name| lookup.get(&normalize_identifier(name)));
        if let Some(actual) = found {
            columns.insert(optional.canonical, (*actual).clone());
        }
    }

    Ok(Some(ResolvedTable { table, columns }))
}
