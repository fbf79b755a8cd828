//! SQLite schema for garden and plant storage

/// Maximum length of name-like text columns
pub const NAME_MAX_LEN: usize = 50;

/// Maximum length of notes columns
pub const NOTES_MAX_LEN: usize = 500;

/// SQLite schema definition
pub struct Schema;

impl Schema {
    /// Connection settings applied before any table is touched
    pub fn pragmas() -> &'static str {
        "PRAGMA foreign_keys = ON;"
    }

    /// Get the complete schema SQL
    pub fn create_tables() -> &'static str {
        r#"
-- Gardens table
CREATE TABLE IF NOT EXISTS gardens (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) <= 50),
    notes TEXT NOT NULL CHECK (length(notes) <= 500)
);

-- Plants table; garden_id is cleared when the owning garden is deleted
CREATE TABLE IF NOT EXISTS plants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) <= 50),
    common_name TEXT NOT NULL CHECK (length(common_name) <= 50),
    category TEXT NOT NULL CHECK (length(category) <= 50),
    location TEXT NOT NULL CHECK (length(location) <= 50),
    year INTEGER NOT NULL,
    notes TEXT NOT NULL CHECK (length(notes) <= 500),
    garden_id INTEGER REFERENCES gardens(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_plants_garden ON plants(garden_id);
CREATE INDEX IF NOT EXISTS idx_plants_category ON plants(category);
CREATE INDEX IF NOT EXISTS idx_plants_location ON plants(location);
"#
    }
}
