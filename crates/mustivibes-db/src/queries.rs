use crate::Database;
use crate::models::{PreferencesRow, SessionRow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

/// SQLite's `datetime('now')` layout, so expiry compares as text.
const SQLITE_TIME: &str = "%Y-%m-%d %H:%M:%S";

pub struct NewSession<'a> {
    pub id: &'a str,
    pub admin_id: &'a str,
    pub email: &'a str,
    pub admin_json: &'a str,
    pub backend_token: &'a str,
    pub expires_at: DateTime<Utc>,
}

impl Database {
    // -- Sessions --

    pub fn create_session(&self, session: &NewSession<'_>) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO sessions (id, admin_id, email, admin_json, backend_token, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    session.id,
                    session.admin_id,
                    session.email,
                    session.admin_json,
                    session.backend_token,
                    session.expires_at.format(SQLITE_TIME).to_string(),
                ],
            )?;
            Ok(())
        })
    }

    /// The session if it exists and has not expired.
    pub fn get_active_session(&self, id: &str) -> Result<Option<SessionRow>> {
        self.with_conn(|conn| query_active_session(conn, id))
    }

    /// Returns whether a row was removed.
    pub fn delete_session(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let removed = conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    pub fn purge_expired_sessions(&self) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let removed = conn.execute(
                "DELETE FROM sessions WHERE expires_at <= datetime('now')",
                [],
            )?;
            Ok(removed)
        })
    }

    // -- Shell preferences --

    pub fn get_preferences(&self, admin_id: &str) -> Result<Option<PreferencesRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT admin_id, dark_mode, sidebar_collapsed, updated_at
                 FROM preferences WHERE admin_id = ?1",
            )?;

            let row = stmt
                .query_row([admin_id], |row| {
                    Ok(PreferencesRow {
                        admin_id: row.get(0)?,
                        dark_mode: row.get(1)?,
                        sidebar_collapsed: row.get(2)?,
                        updated_at: row.get(3)?,
                    })
                })
                .optional()?;

            Ok(row)
        })
    }

    pub fn save_preferences(&self, admin_id: &str, dark_mode: bool, sidebar_collapsed: bool) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO preferences (admin_id, dark_mode, sidebar_collapsed)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(admin_id) DO UPDATE SET
                     dark_mode = excluded.dark_mode,
                     sidebar_collapsed = excluded.sidebar_collapsed,
                     updated_at = datetime('now')",
                rusqlite::params![admin_id, dark_mode, sidebar_collapsed],
            )?;
            Ok(())
        })
    }
}

fn query_active_session(conn: &Connection, id: &str) -> Result<Option<SessionRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, admin_id, email, admin_json, backend_token, created_at, expires_at
         FROM sessions
         WHERE id = ?1 AND expires_at > datetime('now')",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(SessionRow {
                id: row.get(0)?,
                admin_id: row.get(1)?,
                email: row.get(2)?,
                admin_json: row.get(3)?,
                backend_token: row.get(4)?,
                created_at: row.get(5)?,
                expires_at: row.get(6)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
