use rusqlite::Connection;

use crate::error::Result;

/// Initialise the alarm schema in `conn`.
///
/// Creates the single-slot `alarm` table (idempotent). `slot` is constrained
/// to 0 so the table can never hold more than one row. `synchronous=FULL`
/// because a save must be durable before it returns: the whole point of the
/// slot is surviving a power cut.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA synchronous = FULL;

        CREATE TABLE IF NOT EXISTS alarm (
            slot        INTEGER NOT NULL PRIMARY KEY CHECK (slot = 0),
            fire_at_ms  TEXT    NOT NULL    -- epoch milliseconds, as text
        ) STRICT;
        ",
    )?;
    Ok(())
}
