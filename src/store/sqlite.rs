use std::path::{Path, PathBuf};

use anyhow::Context;
use rusqlite::{Connection, OptionalExtension, Transaction, params};

use crate::{
    canvas::model::{Canvas, Fragment, NewFragment},
    foundation::{
        core::{CanvasId, FragmentId, Rect},
        error::{ChartError, ChartResult},
    },
    store::metadata::{MetadataStore, now_ms},
};

const DB_FILE_NAME: &str = "chartographer.db";
const FRAGMENT_SEQ_COUNTER: &str = "fragment_seq";
const FRAGMENT_COLUMNS: &str = "id, canvas_id, x, y, width, height, seq, inserted_at_ms";

/// Durable metadata store on an embedded SQLite database.
///
/// Fragment `seq` values come from a persistent counter, so they keep increasing across restarts
/// and are never reused after deletions.
#[derive(Debug)]
pub struct SqliteMetadataStore {
    path: Option<PathBuf>,
    conn: Connection,
}

impl SqliteMetadataStore {
    /// Open (or create) `<dir>/chartographer.db`.
    pub fn open(dir: impl AsRef<Path>) -> ChartResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create database dir '{}'", dir.display()))
            .map_err(ChartError::storage)?;
        let path = dir.join(DB_FILE_NAME);
        let conn = Connection::open(&path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        tracing::info!(path = %path.display(), "metadata store ready");
        let store = Self {
            path: Some(path),
            conn,
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> ChartResult<Self> {
        let store = Self {
            path: None,
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    /// Database file, or `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn migrate(&self) -> ChartResult<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA foreign_keys=ON;

            CREATE TABLE IF NOT EXISTS meta (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS counters (
              name TEXT PRIMARY KEY,
              value INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS canvases (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              width INTEGER NOT NULL,
              height INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS fragments (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              canvas_id INTEGER NOT NULL REFERENCES canvases(id) ON DELETE CASCADE,
              x INTEGER NOT NULL,
              y INTEGER NOT NULL,
              width INTEGER NOT NULL,
              height INTEGER NOT NULL,
              seq INTEGER NOT NULL UNIQUE,
              inserted_at_ms INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_fragments_canvas_seq ON fragments(canvas_id, seq);
            "#,
        )?;
        self.conn.execute(
            "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
            params!["schema_version", "v1"],
        )?;
        Ok(())
    }
}

impl MetadataStore for SqliteMetadataStore {
    fn insert_canvas(&mut self, width: u32, height: u32) -> ChartResult<Canvas> {
        self.conn.execute(
            "INSERT INTO canvases(width, height) VALUES (?1, ?2)",
            params![width, height],
        )?;
        Ok(Canvas {
            id: CanvasId(self.conn.last_insert_rowid()),
            width,
            height,
        })
    }

    fn get_canvas(&self, id: CanvasId) -> ChartResult<Canvas> {
        self.conn
            .query_row(
                "SELECT id, width, height FROM canvases WHERE id=?1",
                params![id.0],
                |row| {
                    Ok(Canvas {
                        id: CanvasId(row.get(0)?),
                        width: row.get(1)?,
                        height: row.get(2)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| ChartError::not_found(format!("canvas {id}")))
    }

    fn delete_canvas(&mut self, id: CanvasId) -> ChartResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM canvases WHERE id=?1", params![id.0])?;
        if removed == 0 {
            return Err(ChartError::not_found(format!("canvas {id}")));
        }
        Ok(())
    }

    fn insert_fragment(&mut self, fragment: NewFragment) -> ChartResult<Fragment> {
        let tx = self.conn.transaction()?;
        let canvas_exists = tx
            .query_row(
                "SELECT 1 FROM canvases WHERE id=?1",
                params![fragment.canvas_id.0],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !canvas_exists {
            return Err(ChartError::not_found(format!(
                "canvas {}",
                fragment.canvas_id
            )));
        }

        let seq = next_counter_tx(&tx, FRAGMENT_SEQ_COUNTER)?;
        let inserted_at_ms = now_ms();
        let rect = fragment.rect;
        tx.execute(
            r#"
            INSERT INTO fragments(canvas_id, x, y, width, height, seq, inserted_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                fragment.canvas_id.0,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                seq,
                inserted_at_ms
            ],
        )?;
        let id = FragmentId(tx.last_insert_rowid());
        tx.commit()?;

        Ok(Fragment {
            id,
            canvas_id: fragment.canvas_id,
            rect,
            seq: seq as u64,
            inserted_at_ms,
        })
    }

    fn get_fragment(&self, id: FragmentId) -> ChartResult<Fragment> {
        self.conn
            .query_row(
                &format!("SELECT {FRAGMENT_COLUMNS} FROM fragments WHERE id=?1"),
                params![id.0],
                read_fragment,
            )
            .optional()?
            .ok_or_else(|| ChartError::not_found(format!("fragment {id}")))
    }

    fn list_fragments(&self, canvas: CanvasId) -> ChartResult<Vec<Fragment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {FRAGMENT_COLUMNS} FROM fragments WHERE canvas_id=?1 ORDER BY seq ASC"
        ))?;
        let rows = stmt.query_map(params![canvas.0], read_fragment)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn delete_fragment(&mut self, id: FragmentId) -> ChartResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM fragments WHERE id=?1", params![id.0])?;
        if removed == 0 {
            return Err(ChartError::not_found(format!("fragment {id}")));
        }
        Ok(())
    }
}

fn read_fragment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Fragment> {
    let seq: i64 = row.get(6)?;
    Ok(Fragment {
        id: FragmentId(row.get(0)?),
        canvas_id: CanvasId(row.get(1)?),
        rect: Rect {
            x: row.get(2)?,
            y: row.get(3)?,
            width: row.get(4)?,
            height: row.get(5)?,
        },
        seq: seq as u64,
        inserted_at_ms: row.get(7)?,
    })
}

fn next_counter_tx(tx: &Transaction<'_>, name: &str) -> ChartResult<i64> {
    let current: i64 = tx
        .query_row(
            "SELECT value FROM counters WHERE name=?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);
    let next = current + 1;
    tx.execute(
        r#"
        INSERT INTO counters(name, value) VALUES (?1, ?2)
        ON CONFLICT(name) DO UPDATE SET value=excluded.value
        "#,
        params![name, next],
    )?;
    Ok(next)
}

#[cfg(test)]
#[path = "../../tests/unit/store/sqlite.rs"]
mod tests;
