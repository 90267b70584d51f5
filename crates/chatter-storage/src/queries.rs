use crate::Database;
use crate::models::KvRow;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Key/value --

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| Ok(query_kv(conn, key)?.map(|row| row.value)))
    }

    pub fn get_row(&self, key: &str) -> Result<Option<KvRow>> {
        self.with_conn(|conn| query_kv(conn, key))
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                (key, value),
            )?;
            Ok(())
        })
    }

    /// Write several keys in one transaction so readers never see half of them.
    pub fn set_values(&self, entries: &[(&str, &str)]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for (key, value) in entries {
                tx.execute(
                    "INSERT INTO kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                    (key, value),
                )?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Returns how many of the keys existed.
    pub fn delete_values(&self, keys: &[&str]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut removed = 0;
            for key in keys {
                removed += tx.execute("DELETE FROM kv WHERE key = ?1", [key])?;
            }
            tx.commit()?;
            Ok(removed)
        })
    }
}

fn query_kv(conn: &Connection, key: &str) -> Result<Option<KvRow>> {
    let mut stmt = conn.prepare("SELECT key, value, updated_at FROM kv WHERE key = ?1")?;

    let row = stmt
        .query_row([key], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .optional()?;

    Ok(row.map(|(key, value, updated_at)| KvRow {
        // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
        updated_at: chrono::NaiveDateTime::parse_from_str(&updated_at, "%Y-%m-%d %H:%M:%S")
            .map(|ndt| ndt.and_utc())
            .unwrap_or_else(|e| {
                tracing::warn!("Corrupt updated_at '{}' on key '{}': {}", updated_at, key, e);
                chrono::DateTime::default()
            }),
        key,
        value,
    }))
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
