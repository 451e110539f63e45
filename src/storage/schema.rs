//! Database schema for SQLite card stores

/// SQL schema for the database
///
/// `card_url` is the primary key, so the store itself refuses duplicates even
/// if two runs race on the same file.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS cards (
    card_url TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    raw_price TEXT NOT NULL,
    raw_volume TEXT NOT NULL,
    grade_7 TEXT NOT NULL,
    grade_7_volume TEXT NOT NULL,
    grade_8 TEXT NOT NULL,
    grade_8_volume TEXT NOT NULL,
    grade_9 TEXT NOT NULL,
    grade_9_volume TEXT NOT NULL,
    grade_9_5 TEXT NOT NULL,
    grade_9_5_volume TEXT NOT NULL,
    psa_10 TEXT NOT NULL,
    psa_10_volume TEXT NOT NULL,
    rarity TEXT NOT NULL,
    model_number TEXT NOT NULL,
    image_url TEXT NOT NULL,
    inserted_at TEXT NOT NULL
);
"#;

/// Insert statement; rows for known card URLs are ignored
pub const INSERT_CARD_SQL: &str = r#"
INSERT OR IGNORE INTO cards (
    name,
    raw_price, raw_volume,
    grade_7, grade_7_volume,
    grade_8, grade_8_volume,
    grade_9, grade_9_volume,
    grade_9_5, grade_9_5_volume,
    psa_10, psa_10_volume,
    rarity, model_number, image_url, card_url,
    inserted_at
) VALUES (
    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18
)
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
