// src/app/store.rs: SQLite home for the genre index
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::app::error::{MediaError, MediaResult};
use crate::app::genres::{DurableStore, GenreMap};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS genres (
  id   INTEGER PRIMARY KEY,
  name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS genre_meta (
  key   TEXT PRIMARY KEY,
  value TEXT NOT NULL
);
"#;

const META_REFRESHED_AT: &str = "last_genre_fetch_date";

fn storage_err(context: &str) -> impl Fn(rusqlite::Error) -> MediaError + '_ {
    move |e| MediaError::Storage(format!("{context}: {e}"))
}

pub struct SqliteGenreStore {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteGenreStore {
    pub fn open(path: &Path) -> MediaResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MediaError::Storage(format!("create {}: {e}", parent.display())))?;
        }
        let conn = Connection::open(path).map_err(storage_err("open genre db"))?;
        let _ = conn.busy_timeout(Duration::from_secs(5));
        conn.execute_batch(SCHEMA)
            .map_err(storage_err("create genre schema"))?;
        debug!("genre store at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn with_conn<R, F>(&self, f: F) -> MediaResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut Connection) -> MediaResult<R> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|e| MediaError::Storage(format!("genre db lock poisoned: {e}")))?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| MediaError::Storage(format!("genre db task: {e}")))?
    }
}

fn read_index(conn: &mut Connection) -> MediaResult<Option<(GenreMap, DateTime<Utc>)>> {
    let stamp: Option<String> = conn
        .query_row(
            "SELECT value FROM genre_meta WHERE key = ?1",
            [META_REFRESHED_AT],
            |row| row.get(0),
        )
        .optional()
        .map_err(storage_err("read genre timestamp"))?;
    let Some(stamp) = stamp else {
        return Ok(None);
    };
    let refreshed_at = DateTime::parse_from_rfc3339(&stamp)
        .map_err(|e| MediaError::Storage(format!("bad genre timestamp {stamp:?}: {e}")))?
        .with_timezone(&Utc);

    let mut stmt = conn
        .prepare("SELECT id, name FROM genres")
        .map_err(storage_err("prepare genre read"))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?)))
        .map_err(storage_err("read genres"))?;
    let mut genres = GenreMap::new();
    for row in rows {
        let (id, name) = row.map_err(storage_err("read genre row"))?;
        genres.insert(id, name);
    }
    Ok(Some((genres, refreshed_at)))
}

fn write_index(
    conn: &mut Connection,
    genres: &GenreMap,
    refreshed_at: DateTime<Utc>,
) -> MediaResult<()> {
    let tx = conn
        .transaction()
        .map_err(storage_err("begin genre write"))?;
    tx.execute("DELETE FROM genres", [])
        .map_err(storage_err("clear genres"))?;
    {
        let mut insert = tx
            .prepare("INSERT INTO genres (id, name) VALUES (?1, ?2)")
            .map_err(storage_err("prepare genre insert"))?;
        for (id, name) in genres {
            insert
                .execute(params![id, name])
                .map_err(storage_err("insert genre"))?;
        }
    }
    tx.execute(
        "INSERT OR REPLACE INTO genre_meta (key, value) VALUES (?1, ?2)",
        params![META_REFRESHED_AT, refreshed_at.to_rfc3339()],
    )
    .map_err(storage_err("write genre timestamp"))?;
    tx.commit().map_err(storage_err("commit genres"))
}

#[async_trait]
impl DurableStore for SqliteGenreStore {
    async fn read_genre_index(&self) -> MediaResult<Option<(GenreMap, DateTime<Utc>)>> {
        self.with_conn(read_index).await
    }

    async fn write_genre_index(
        &self,
        genres: &GenreMap,
        refreshed_at: DateTime<Utc>,
    ) -> MediaResult<()> {
        let genres = genres.clone();
        self.with_conn(move |conn| write_index(conn, &genres, refreshed_at))
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::SqliteGenreStore;
    use crate::app::genres::{DurableStore, GenreMap};

    #[tokio::test]
    async fn empty_db_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteGenreStore::open(&dir.path().join("genres.db")).unwrap();
        assert!(store.read_genre_index().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn writes_replace_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("genres.db");
        let store = SqliteGenreStore::open(&path).unwrap();

        let first: GenreMap = [(18, "Drama".to_string()), (28, "Action".to_string())].into();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.write_genre_index(&first, t1).await.unwrap();

        let second: GenreMap = [(35, "Comedy".to_string())].into();
        let t2 = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        store.write_genre_index(&second, t2).await.unwrap();
        drop(store);

        // reopen to prove it hit disk
        let reopened = SqliteGenreStore::open(&path).unwrap();
        let (genres, at) = reopened.read_genre_index().await.unwrap().unwrap();
        assert_eq!(genres, second);
        assert_eq!(at, t2);
    }
}
