pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS delivery_years (
    year          INTEGER PRIMARY KEY,
    price_per_kg  TEXT NOT NULL,
    saved_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS delivery_months (
    year           INTEGER NOT NULL REFERENCES delivery_years(year) ON DELETE CASCADE,
    month_index    INTEGER NOT NULL CHECK (month_index BETWEEN 0 AND 11),
    not_delivered  INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (year, month_index)
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
