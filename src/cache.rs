//! SQLite-backed local cache.
//!
//! Two small stores:
//! - `recent_clients`: a 24h-TTL snapshot of the shuffled recent-client list
//! - `client_custom_fields`: per-client notes and AUM overrides
//!
//! Everything else stays vendor-authoritative; this file is the only local
//! persistence in the service.

use std::path::Path;

use rusqlite::Connection;

use crate::types::{ClientCustomFields, Contact};

/// Recent-clients snapshot lifetime.
const RECENT_CLIENTS_TTL_HOURS: i64 = 24;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS recent_clients (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    payload TEXT NOT NULL,
    cached_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS client_custom_fields (
    client_id INTEGER PRIMARY KEY,
    notes TEXT,
    aum_override REAL,
    updated_at TEXT NOT NULL
);
";

pub struct CacheDb {
    conn: Connection,
}

impl CacheDb {
    /// Open (or create) the cache at the default location,
    /// `~/.practiceos/cache.db`.
    pub fn open_default() -> Result<Self, String> {
        let dir = dirs::home_dir()
            .ok_or("Could not find home directory")?
            .join(".practiceos");
        if !dir.exists() {
            std::fs::create_dir_all(&dir)
                .map_err(|e| format!("Failed to create cache dir: {}", e))?;
        }
        Self::open(&dir.join("cache.db"))
    }

    pub fn open(path: &Path) -> Result<Self, String> {
        let conn = Connection::open(path)
            .map_err(|e| format!("Failed to open cache at {}: {}", path.display(), e))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| format!("Failed to create cache schema: {}", e))?;
        Ok(Self { conn })
    }

    // -------------------------------------------------------------------
    // Recent clients (24h TTL)
    // -------------------------------------------------------------------

    /// Read the cached recent-clients list if it is still fresh.
    pub fn get_recent_clients(&self) -> Option<Vec<Contact>> {
        let (payload, cached_at): (String, String) = self
            .conn
            .query_row(
                "SELECT payload, cached_at FROM recent_clients WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .ok()?;

        if is_stale(&cached_at) {
            return None;
        }
        serde_json::from_str(&payload).ok()
    }

    /// Replace the cached recent-clients list, stamping it now.
    pub fn put_recent_clients(&self, contacts: &[Contact]) -> Result<(), String> {
        let payload =
            serde_json::to_string(contacts).map_err(|e| format!("Serialize error: {}", e))?;
        self.conn
            .execute(
                "INSERT INTO recent_clients (id, payload, cached_at)
                 VALUES (1, ?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET
                    payload = excluded.payload,
                    cached_at = excluded.cached_at",
                rusqlite::params![payload, chrono::Utc::now().to_rfc3339()],
            )
            .map_err(|e| format!("Failed to cache recent clients: {}", e))?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Per-client custom fields
    // -------------------------------------------------------------------

    pub fn get_custom_fields(&self, client_id: u64) -> Option<ClientCustomFields> {
        self.conn
            .query_row(
                "SELECT notes, aum_override FROM client_custom_fields WHERE client_id = ?1",
                [client_id as i64],
                |row| {
                    Ok(ClientCustomFields {
                        notes: row.get(0)?,
                        aum_override: row.get(1)?,
                    })
                },
            )
            .ok()
    }

    pub fn upsert_custom_fields(
        &self,
        client_id: u64,
        fields: &ClientCustomFields,
    ) -> Result<(), String> {
        self.conn
            .execute(
                "INSERT INTO client_custom_fields (client_id, notes, aum_override, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(client_id) DO UPDATE SET
                    notes = excluded.notes,
                    aum_override = excluded.aum_override,
                    updated_at = excluded.updated_at",
                rusqlite::params![
                    client_id as i64,
                    fields.notes,
                    fields.aum_override,
                    chrono::Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| format!("Failed to upsert custom fields: {}", e))?;
        Ok(())
    }

    /// All stored overrides, keyed by client id.
    pub fn all_custom_fields(&self) -> Result<Vec<(u64, ClientCustomFields)>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT client_id, notes, aum_override FROM client_custom_fields")
            .map_err(|e| format!("Failed to query custom fields: {}", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)? as u64,
                    ClientCustomFields {
                        notes: row.get(1)?,
                        aum_override: row.get(2)?,
                    },
                ))
            })
            .map_err(|e| format!("Failed to read custom fields: {}", e))?;

        let mut out = Vec::new();
        for row in rows.flatten() {
            out.push(row);
        }
        Ok(out)
    }
}

/// A snapshot older than the TTL is stale; unparseable timestamps count as
/// stale so bad rows get overwritten rather than served forever.
fn is_stale(cached_at: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(cached_at)
        .map(|dt| {
            let age = chrono::Utc::now() - dt.with_timezone(&chrono::Utc);
            age.num_hours() >= RECENT_CLIENTS_TTL_HOURS
        })
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn contact(id: u64) -> Contact {
        Contact {
            id,
            name: format!("Contact {}", id),
            email: None,
            phone: None,
            company: None,
            tags: BTreeSet::new(),
            last_modified: None,
        }
    }

    fn open_temp() -> (tempfile::TempDir, CacheDb) {
        let dir = tempfile::tempdir().unwrap();
        let db = CacheDb::open(&dir.path().join("cache.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_recent_clients_roundtrip() {
        let (_dir, db) = open_temp();
        assert!(db.get_recent_clients().is_none());

        db.put_recent_clients(&[contact(1), contact(2)]).unwrap();
        let cached = db.get_recent_clients().unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].id, 1);
    }

    #[test]
    fn test_recent_clients_overwrite() {
        let (_dir, db) = open_temp();
        db.put_recent_clients(&[contact(1)]).unwrap();
        db.put_recent_clients(&[contact(2), contact(3)]).unwrap();
        let cached = db.get_recent_clients().unwrap();
        assert_eq!(cached.len(), 2);
    }

    #[test]
    fn test_stale_snapshot_is_ignored() {
        let (_dir, db) = open_temp();
        let payload = serde_json::to_string(&[contact(1)]).unwrap();
        let old = (chrono::Utc::now() - chrono::Duration::hours(25)).to_rfc3339();
        db.conn
            .execute(
                "INSERT INTO recent_clients (id, payload, cached_at) VALUES (1, ?1, ?2)",
                rusqlite::params![payload, old],
            )
            .unwrap();
        assert!(db.get_recent_clients().is_none());
    }

    #[test]
    fn test_is_stale_rejects_garbage_timestamps() {
        assert!(is_stale("not-a-timestamp"));
        assert!(!is_stale(&chrono::Utc::now().to_rfc3339()));
    }

    #[test]
    fn test_custom_fields_upsert_and_get() {
        let (_dir, db) = open_temp();
        assert!(db.get_custom_fields(7).is_none());

        db.upsert_custom_fields(
            7,
            &ClientCustomFields {
                notes: Some("Prefers quarterly calls".to_string()),
                aum_override: Some(1_250_000.0),
            },
        )
        .unwrap();

        let fields = db.get_custom_fields(7).unwrap();
        assert_eq!(fields.notes.as_deref(), Some("Prefers quarterly calls"));
        assert_eq!(fields.aum_override, Some(1_250_000.0));

        // Update in place.
        db.upsert_custom_fields(
            7,
            &ClientCustomFields {
                notes: None,
                aum_override: Some(2_000_000.0),
            },
        )
        .unwrap();
        let fields = db.get_custom_fields(7).unwrap();
        assert!(fields.notes.is_none());

        let all = db.all_custom_fields().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, 7);
    }
}
