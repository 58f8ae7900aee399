//! SQLite-backed store via libsql. Implements UserStore and PostStore.
//!
//! One database file (data/community.db) with `users` and `posts` tables.
//! `task` and `comments` are kept as JSON text; `created_at` as epoch millis,
//! with the autoincrement `seq` column breaking ties between equal timestamps.

use super::clock::{CreationClock, to_datetime};
use crate::domain::{DomainError, NewPost, PopulatedPost, Post, User};
use crate::ports::{PostStore, UserStore};
use libsql::{Connection, Database, Row, params};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL
)"#;

const POSTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    author TEXT NOT NULL,
    content TEXT NOT NULL,
    task_json TEXT NOT NULL DEFAULT 'null',
    points INTEGER NOT NULL,
    likes INTEGER NOT NULL DEFAULT 0,
    comments_json TEXT NOT NULL DEFAULT '[]',
    created_at INTEGER NOT NULL
)"#;
const POSTS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_posts_created ON posts (created_at DESC, seq DESC)";

/// Concurrent writers wait this long for the lock instead of failing with SQLITE_BUSY.
const BUSY_TIMEOUT_MS: u64 = 5_000;

fn repo_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Repo(e.to_string())
}

/// SQLite store. One database file (community.db) in the given base directory.
pub struct SqliteRepo {
    db: Database,
    db_path: PathBuf,
    clock: CreationClock,
}

impl SqliteRepo {
    /// Connect to (or create) the database and ensure the schema exists.
    /// Call this once at startup; the returned repo is safe to share via Arc.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(repo_err)?;
        let db_path = base.join("community.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(repo_err)?;
        let conn = db.connect().map_err(repo_err)?;

        // WAL: concurrent readers plus one writer.
        pragma(&conn, "PRAGMA journal_mode=WAL").await?;
        pragma(&conn, "PRAGMA synchronous=NORMAL").await?;

        conn.execute(USERS_TABLE, ()).await.map_err(repo_err)?;
        conn.execute(POSTS_TABLE, ()).await.map_err(repo_err)?;
        conn.execute(POSTS_INDEX, ()).await.map_err(repo_err)?;

        let mut rows = conn
            .query("SELECT COALESCE(MAX(created_at), 0) FROM posts", ())
            .await
            .map_err(repo_err)?;
        let last_created_ms = match rows.next().await.map_err(repo_err)? {
            Some(row) => row.get::<i64>(0).map_err(repo_err)?,
            None => 0,
        };

        info!(path = %db_path.display(), "SQLite connected with WAL mode");

        Ok(Self {
            db,
            db_path,
            clock: CreationClock::starting_at(last_created_ms),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Insert or update a user row. Users are owned by another service; this
    /// exists for seeding and tests.
    pub async fn save_user(&self, user: &User) -> Result<(), DomainError> {
        let conn = self.conn().await?;
        conn.execute(
            r#"
            INSERT INTO users (id, name, email) VALUES (?1, ?2, ?3)
            ON CONFLICT (id) DO UPDATE SET name = excluded.name, email = excluded.email
            "#,
            params![user.id.as_str(), user.name.as_str(), user.email.as_str()],
        )
        .await
        .map_err(repo_err)?;
        Ok(())
    }

    async fn conn(&self) -> Result<Connection, DomainError> {
        let conn = self.db.connect().map_err(repo_err)?;
        pragma(&conn, &format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}")).await?;
        Ok(conn)
    }

    fn row_to_post(row: &Row) -> Result<Post, DomainError> {
        let task_json: String = row.get(3).map_err(repo_err)?;
        let comments_json: String = row.get(6).map_err(repo_err)?;
        let created_ms: i64 = row.get(7).map_err(repo_err)?;
        Ok(Post {
            id: row.get(0).map_err(repo_err)?,
            author: row.get(1).map_err(repo_err)?,
            content: row.get(2).map_err(repo_err)?,
            task: serde_json::from_str(&task_json).map_err(repo_err)?,
            points: row.get(4).map_err(repo_err)?,
            likes: row.get(5).map_err(repo_err)?,
            comments: serde_json::from_str(&comments_json).map_err(repo_err)?,
            created_at: to_datetime(created_ms)?,
        })
    }
}

/// PRAGMA statements return a row; `execute` fails when rows come back, so
/// query and drain instead.
async fn pragma(conn: &Connection, sql: &str) -> Result<(), DomainError> {
    let mut rows = conn
        .query(sql, ())
        .await
        .map_err(|e| DomainError::Repo(format!("{sql} failed: {e}")))?;
    while rows.next().await.map_err(repo_err)?.is_some() {}
    Ok(())
}

#[async_trait::async_trait]
impl UserStore for SqliteRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query(
                "SELECT id, name, email FROM users WHERE id = ?1",
                params![id],
            )
            .await
            .map_err(repo_err)?;

        if let Some(row) = rows.next().await.map_err(repo_err)? {
            Ok(Some(User {
                id: row.get(0).map_err(repo_err)?,
                name: row.get(1).map_err(repo_err)?,
                email: row.get(2).map_err(repo_err)?,
            }))
        } else {
            Ok(None)
        }
    }
}

#[async_trait::async_trait]
impl PostStore for SqliteRepo {
    async fn find_recent(&self, limit: usize) -> Result<Vec<PopulatedPost>, DomainError> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query(
                r#"
                SELECT p.id, p.author, p.content, p.task_json, p.points, p.likes,
                       p.comments_json, p.created_at, u.id, u.name, u.email
                FROM posts p
                LEFT JOIN users u ON u.id = p.author
                ORDER BY p.created_at DESC, p.seq DESC
                LIMIT ?1
                "#,
                params![limit as i64],
            )
            .await
            .map_err(repo_err)?;

        let mut posts = Vec::new();
        while let Some(row) = rows.next().await.map_err(repo_err)? {
            let post = Self::row_to_post(&row)?;
            // LEFT JOIN: author columns are NULL when the user row is gone.
            let author = match row.get_value(8).map_err(repo_err)? {
                libsql::Value::Text(id) => Some(User {
                    id,
                    name: row.get(9).map_err(repo_err)?,
                    email: row.get(10).map_err(repo_err)?,
                }),
                _ => None,
            };
            posts.push(PopulatedPost { post, author });
        }
        Ok(posts)
    }

    async fn insert(&self, post: NewPost) -> Result<Post, DomainError> {
        let content = post
            .content
            .ok_or_else(|| DomainError::Validation("content is required".into()))?;
        let created_at = self.clock.stamp()?;
        let stored = Post {
            id: Uuid::new_v4().to_string(),
            author: post.author,
            content,
            task: post.task,
            points: post.points,
            likes: 0,
            comments: Vec::new(),
            created_at,
        };
        let task_json = serde_json::to_string(&stored.task).map_err(repo_err)?;

        let conn = self.conn().await?;
        conn.execute(
            r#"
            INSERT INTO posts (id, author, content, task_json, points, likes, comments_json, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 0, '[]', ?6)
            "#,
            params![
                stored.id.as_str(),
                stored.author.as_str(),
                stored.content.as_str(),
                task_json,
                stored.points,
                stored.created_at.timestamp_millis()
            ],
        )
        .await
        .map_err(repo_err)?;

        info!(post_id = %stored.id, author = %stored.author, "post inserted");
        Ok(stored)
    }

    async fn increment_likes(&self, post_id: &str) -> Result<Option<i64>, DomainError> {
        let conn = self.conn().await?;
        // Single statement: the increment and the read of the new value are atomic.
        let mut rows = conn
            .query(
                "UPDATE posts SET likes = likes + 1 WHERE id = ?1 RETURNING likes",
                params![post_id],
            )
            .await
            .map_err(repo_err)?;

        let likes = match rows.next().await.map_err(repo_err)? {
            Some(row) => Some(row.get::<i64>(0).map_err(repo_err)?),
            None => None,
        };
        while rows.next().await.map_err(repo_err)?.is_some() {}
        Ok(likes)
    }
}
