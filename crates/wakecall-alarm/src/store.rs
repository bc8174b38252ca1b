use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::{
    db::init_db,
    error::{AlarmError, Result},
};

/// Durable single-slot store for the next scheduled fire time.
///
/// Write-through shadow of the scheduler's in-memory state: while the process
/// is live the scheduler is the source of truth, the store only exists so a
/// restart can recover. Cloning shares the underlying connection.
#[derive(Clone)]
pub struct AlarmStore {
    conn: Arc<Mutex<Connection>>,
}

impl AlarmStore {
    /// Wrap a connection, initialising the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Persist `fire_at`, overwriting any previous value. Durable on return.
    pub fn save(&self, fire_at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO alarm (slot, fire_at_ms) VALUES (0, ?1)
             ON CONFLICT (slot) DO UPDATE SET fire_at_ms = excluded.fire_at_ms",
            [fire_at.timestamp_millis().to_string()],
        )?;
        Ok(())
    }

    /// Remove the persisted record. No-op when already absent.
    pub fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM alarm WHERE slot = 0", [])?;
        Ok(())
    }

    /// Read the persisted fire time, if any.
    ///
    /// `Ok(None)` when no record exists; [`AlarmError::Parse`] when a record
    /// exists but does not hold a valid epoch-millisecond integer.
    pub fn load(&self) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().unwrap();
        let raw: Option<String> = conn
            .query_row("SELECT fire_at_ms FROM alarm WHERE slot = 0", [], |row| {
                row.get(0)
            })
            .optional()?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let millis: i64 = raw
            .trim()
            .parse()
            .map_err(|_| AlarmError::Parse(format!("not an integer timestamp: {raw:?}")))?;

        match Utc.timestamp_millis_opt(millis).single() {
            Some(t) => Ok(Some(t)),
            None => Err(AlarmError::Parse(format!(
                "timestamp out of range: {millis}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn in_memory_store() -> AlarmStore {
        AlarmStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn load_from_empty_store_is_absent() {
        let store = in_memory_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips_exactly() {
        let store = in_memory_store();
        // Truncate to millis: that is the persisted granularity.
        let t = Utc.timestamp_millis_opt(Utc::now().timestamp_millis()).unwrap();
        store.save(t).unwrap();
        assert_eq!(store.load().unwrap(), Some(t));
    }

    #[test]
    fn save_overwrites_previous_value() {
        let store = in_memory_store();
        let t1 = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let t2 = t1 + Duration::hours(8);
        store.save(t1).unwrap();
        store.save(t2).unwrap();
        assert_eq!(store.load().unwrap(), Some(t2));
    }

    #[test]
    fn clear_removes_the_record() {
        let store = in_memory_store();
        store.save(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn clear_on_empty_store_is_a_noop() {
        let store = in_memory_store();
        assert!(store.clear().is_ok());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn corrupt_record_is_a_parse_error() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db(&conn).unwrap();
        conn.execute(
            "INSERT INTO alarm (slot, fire_at_ms) VALUES (0, 'yesterdayish')",
            [],
        )
        .unwrap();
        let store = AlarmStore::new(conn).unwrap();
        assert!(matches!(store.load(), Err(AlarmError::Parse(_))));
    }
}
