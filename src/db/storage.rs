// src/db/storage.rs
use crate::domain::PersistedState;
use crate::errors::AppError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

/// Key of the persisted bike state blob.
pub const STATE_KEY: &str = "bikeData";

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>, AppError> {
    let value = conn
        .query_row(
            "SELECT value FROM storage WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn put_value(conn: &Connection, key: &str, value: &str) -> Result<(), AppError> {
    conn.execute(
        r#"
        INSERT INTO storage (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
        params![key, value, Utc::now()],
    )?;
    Ok(())
}

/// Reads the persisted state. An undecodable blob yields an empty state.
pub fn load_state(conn: &Connection) -> Result<PersistedState, AppError> {
    let raw = get_value(conn, STATE_KEY)?;
    Ok(PersistedState::load(raw.as_deref()))
}

pub fn save_state(conn: &Connection, state: &PersistedState) -> Result<(), AppError> {
    put_value(conn, STATE_KEY, &state.to_json()?)
}
