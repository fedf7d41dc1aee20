use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sessions (
            id              TEXT PRIMARY KEY,
            admin_id        TEXT NOT NULL,
            email           TEXT NOT NULL,
            admin_json      TEXT NOT NULL,
            backend_token   TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            expires_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_expiry
            ON sessions(expires_at);

        CREATE TABLE IF NOT EXISTS preferences (
            admin_id            TEXT PRIMARY KEY,
            dark_mode           INTEGER NOT NULL DEFAULT 0,
            sidebar_collapsed   INTEGER NOT NULL DEFAULT 0,
            updated_at          TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
