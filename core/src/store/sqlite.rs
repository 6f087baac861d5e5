//! SQLite store built on an `sqlx` connection pool.
//!
//! # Design
//! The schema repeats the record invariants as `CHECK` constraints, so a row
//! written by anything other than this crate still cannot hold an empty name
//! or an out-of-range priority. `AUTOINCREMENT` keeps deleted ids from being
//! reused; `clear` resets the sequence inside the same transaction that
//! deletes the rows. Rows are re-validated on read and rejected, not masked,
//! if they break an invariant.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{Result, TodoError};
use crate::stats::{PriorityBreakdown, TodoStats};
use crate::store::TodoStore;
use crate::todo::{Todo, TodoId};
use crate::types::TodoDraft;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK(length(trim(name)) > 0),
    priority INTEGER NOT NULL DEFAULT 1 CHECK(priority IN (1, 2, 3)),
    done INTEGER NOT NULL DEFAULT 0 CHECK(done IN (0, 1))
);
";

const SELECT_ALL_SQL: &str = "SELECT id, name, priority, done FROM todos ORDER BY id";

const SELECT_ONE_SQL: &str = "SELECT id, name, priority, done FROM todos WHERE id = ?";

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url`, e.g. `sqlite:todos.db`.
    /// A `:memory:` URL is routed to `in_memory`.
    pub async fn connect(url: &str) -> Result<Self> {
        if url.contains(":memory:") {
            return Self::in_memory().await;
        }
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// A private database that lives as long as the store. The pool is pinned
    /// to one connection since every SQLite memory connection is its own
    /// database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if needed.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

fn parse_todo_row(row: &SqliteRow) -> Result<Todo> {
    let id: i64 = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let priority: i64 = row.try_get("priority")?;
    let done: bool = row.try_get("done")?;
    Todo::restore(TodoId(id), name, priority, done)
        .map_err(|e| TodoError::Backend(format!("invalid persisted todo {id}: {e}")))
}

fn count(row: &SqliteRow, column: &str) -> Result<u64> {
    let value: i64 = row.try_get(column)?;
    u64::try_from(value)
        .map_err(|_| TodoError::Backend(format!("negative {column} count: {value}")))
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query(SELECT_ALL_SQL)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(parse_todo_row).collect()
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>> {
        sqlx::query(SELECT_ONE_SQL)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| parse_todo_row(&row))
            .transpose()
    }

    async fn insert(&self, draft: TodoDraft) -> Result<Todo> {
        let result = sqlx::query("INSERT INTO todos (name, priority, done) VALUES (?, ?, ?)")
            .bind(&draft.name)
            .bind(i64::from(draft.priority))
            .bind(draft.done)
            .execute(&self.pool)
            .await?;
        Ok(Todo::from_draft(TodoId(result.last_insert_rowid()), draft))
    }

    async fn save(&self, todo: &Todo) -> Result<bool> {
        let result = sqlx::query("UPDATE todos SET name = ?, priority = ?, done = ? WHERE id = ?")
            .bind(todo.name())
            .bind(i64::from(todo.priority()))
            .bind(todo.done())
            .bind(todo.id().0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM todos")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'todos'")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        debug!(removed, "cleared todos table and reset id sequence");
        Ok(removed)
    }

    async fn stats(&self) -> Result<TodoStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total,
                    COALESCE(SUM(done = 1), 0) AS completed,
                    COALESCE(SUM(priority = 1), 0) AS high,
                    COALESCE(SUM(priority = 2), 0) AS medium,
                    COALESCE(SUM(priority = 3), 0) AS low
             FROM todos",
        )
        .fetch_one(&self.pool)
        .await?;
        let by_priority = PriorityBreakdown {
            high: count(&row, "high")?,
            medium: count(&row, "medium")?,
            low: count(&row, "low")?,
        };
        Ok(TodoStats::from_counts(
            count(&row, "total")?,
            count(&row, "completed")?,
            by_priority,
        ))
    }
}
