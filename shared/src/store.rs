//! Document store backed by SQLite.
//!
//! One table per collection (`articles`, `categories`, `static_pages`,
//! `users`); each row is the document key plus the serialized JSON body.
//! Find-one-by-key is the only query shape the pipeline depends on. The
//! handle is injectable (no global connection) and shared via `Arc`; a
//! single async mutex serializes access, which also makes the slug
//! primary key an authoritative uniqueness constraint: a conflicting
//! insert fails at the store even if two callers raced past the
//! pre-write guard.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::model::{Article, Category, StaticPage, UserProfile};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,
    #[error("document already exists")]
    AlreadyExists,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Stored article: generated identifier and creation timestamp plus the
/// normalized fields. `created_at` is stamped once and preserved across
/// replaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub id: String,
    pub created_at: i64,
    #[serde(flatten)]
    pub article: Article,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: String,
    pub created_at: i64,
    #[serde(flatten)]
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPageRecord {
    pub id: String,
    pub updated_at: i64,
    #[serde(flatten)]
    pub page: StaticPage,
}

pub struct DocumentStore {
    conn: Mutex<Connection>,
}

impl DocumentStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open document store at {}", path.display()))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().context("failed to open in-memory document store")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS articles (
                 slug       TEXT PRIMARY KEY,
                 id         TEXT NOT NULL,
                 created_at INTEGER NOT NULL,
                 body       TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS categories (
                 slug       TEXT PRIMARY KEY,
                 id         TEXT NOT NULL,
                 created_at INTEGER NOT NULL,
                 body       TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS static_pages (
                 slug       TEXT PRIMARY KEY,
                 id         TEXT NOT NULL,
                 updated_at INTEGER NOT NULL,
                 body       TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS users (
                 uid  TEXT PRIMARY KEY,
                 body TEXT NOT NULL
             );",
        )
        .context("failed to initialize document store schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // --- articles ---

    pub async fn insert_article(&self, article: Article) -> Result<ArticleRecord, StoreError> {
        let record = ArticleRecord {
            id: Uuid::new_v4().to_string(),
            created_at: now_ms(),
            article,
        };
        let body = serde_json::to_string(&record.article).context("serialize article")?;
        let conn = self.conn.lock().await;
        insert_row(
            &conn,
            "INSERT INTO articles (slug, id, created_at, body) VALUES (?1, ?2, ?3, ?4)",
            params![record.article.slug, record.id, record.created_at, body],
            "insert article",
        )?;
        Ok(record)
    }

    pub async fn find_article(&self, slug: &str) -> Result<Option<ArticleRecord>, StoreError> {
        let conn = self.conn.lock().await;
        let row: Option<(String, i64, String)> = conn
            .query_row(
                "SELECT id, created_at, body FROM articles WHERE slug = ?1",
                params![slug],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .context("find article")?;
        row.map(|(id, created_at, body)| {
            let article = serde_json::from_str(&body).context("deserialize article")?;
            Ok(ArticleRecord {
                id,
                created_at,
                article,
            })
        })
        .transpose()
        .map_err(StoreError::Backend)
    }

    pub async fn list_articles(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT id, created_at, body FROM articles ORDER BY created_at DESC")
            .context("prepare article listing")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?))
            })
            .context("list articles")?;
        let mut records = Vec::new();
        for row in rows {
            let (id, created_at, body) = row.context("read article row")?;
            let article = serde_json::from_str(&body).context("deserialize article")?;
            records.push(ArticleRecord {
                id,
                created_at,
                article,
            });
        }
        Ok(records)
    }

    /// Replace every field of an existing article, preserving the original
    /// identifier and `created_at`. The slug key itself is never re-keyed.
    pub async fn replace_article(
        &self,
        slug: &str,
        article: Article,
    ) -> Result<ArticleRecord, StoreError> {
        let conn = self.conn.lock().await;
        let existing: Option<(String, i64)> = conn
            .query_row(
                "SELECT id, created_at FROM articles WHERE slug = ?1",
                params![slug],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("look up article for replace")?;
        let (id, created_at) = existing.ok_or(StoreError::NotFound)?;
        let record = ArticleRecord {
            id,
            created_at,
            article,
        };
        let body = serde_json::to_string(&record.article).context("serialize article")?;
        conn.execute("UPDATE articles SET body = ?2 WHERE slug = ?1", params![slug, body])
            .context("replace article")?;
        Ok(record)
    }

    pub async fn delete_article(&self, slug: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        delete_row(&conn, "DELETE FROM articles WHERE slug = ?1", slug, "delete article")
    }

    // --- categories ---

    pub async fn insert_category(&self, category: Category) -> Result<CategoryRecord, StoreError> {
        let record = CategoryRecord {
            id: Uuid::new_v4().to_string(),
            created_at: now_ms(),
            category,
        };
        let body = serde_json::to_string(&record.category).context("serialize category")?;
        let conn = self.conn.lock().await;
        insert_row(
            &conn,
            "INSERT INTO categories (slug, id, created_at, body) VALUES (?1, ?2, ?3, ?4)",
            params![record.category.slug, record.id, record.created_at, body],
            "insert category",
        )?;
        Ok(record)
    }

    pub async fn find_category(&self, slug: &str) -> Result<Option<CategoryRecord>, StoreError> {
        let conn = self.conn.lock().await;
        let row: Option<(String, i64, String)> = conn
            .query_row(
                "SELECT id, created_at, body FROM categories WHERE slug = ?1",
                params![slug],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .context("find category")?;
        row.map(|(id, created_at, body)| {
            let category = serde_json::from_str(&body).context("deserialize category")?;
            Ok(CategoryRecord {
                id,
                created_at,
                category,
            })
        })
        .transpose()
        .map_err(StoreError::Backend)
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryRecord>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT id, created_at, body FROM categories ORDER BY slug ASC")
            .context("prepare category listing")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?))
            })
            .context("list categories")?;
        let mut records = Vec::new();
        for row in rows {
            let (id, created_at, body) = row.context("read category row")?;
            let category = serde_json::from_str(&body).context("deserialize category")?;
            records.push(CategoryRecord {
                id,
                created_at,
                category,
            });
        }
        Ok(records)
    }

    pub async fn replace_category(
        &self,
        slug: &str,
        category: Category,
    ) -> Result<CategoryRecord, StoreError> {
        let conn = self.conn.lock().await;
        let existing: Option<(String, i64)> = conn
            .query_row(
                "SELECT id, created_at FROM categories WHERE slug = ?1",
                params![slug],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("look up category for replace")?;
        let (id, created_at) = existing.ok_or(StoreError::NotFound)?;
        let record = CategoryRecord {
            id,
            created_at,
            category,
        };
        let body = serde_json::to_string(&record.category).context("serialize category")?;
        conn.execute("UPDATE categories SET body = ?2 WHERE slug = ?1", params![slug, body])
            .context("replace category")?;
        Ok(record)
    }

    pub async fn delete_category(&self, slug: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        delete_row(&conn, "DELETE FROM categories WHERE slug = ?1", slug, "delete category")
    }

    // --- static pages ---

    pub async fn insert_static_page(&self, page: StaticPage) -> Result<StaticPageRecord, StoreError> {
        let record = StaticPageRecord {
            id: Uuid::new_v4().to_string(),
            updated_at: now_ms(),
            page,
        };
        let body = serde_json::to_string(&record.page).context("serialize static page")?;
        let conn = self.conn.lock().await;
        insert_row(
            &conn,
            "INSERT INTO static_pages (slug, id, updated_at, body) VALUES (?1, ?2, ?3, ?4)",
            params![record.page.slug, record.id, record.updated_at, body],
            "insert static page",
        )?;
        Ok(record)
    }

    pub async fn find_static_page(
        &self,
        slug: &str,
    ) -> Result<Option<StaticPageRecord>, StoreError> {
        let conn = self.conn.lock().await;
        let row: Option<(String, i64, String)> = conn
            .query_row(
                "SELECT id, updated_at, body FROM static_pages WHERE slug = ?1",
                params![slug],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .context("find static page")?;
        row.map(|(id, updated_at, body)| {
            let page = serde_json::from_str(&body).context("deserialize static page")?;
            Ok(StaticPageRecord {
                id,
                updated_at,
                page,
            })
        })
        .transpose()
        .map_err(StoreError::Backend)
    }

    pub async fn list_static_pages(&self) -> Result<Vec<StaticPageRecord>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT id, updated_at, body FROM static_pages ORDER BY slug ASC")
            .context("prepare static page listing")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?))
            })
            .context("list static pages")?;
        let mut records = Vec::new();
        for row in rows {
            let (id, updated_at, body) = row.context("read static page row")?;
            let page = serde_json::from_str(&body).context("deserialize static page")?;
            records.push(StaticPageRecord {
                id,
                updated_at,
                page,
            });
        }
        Ok(records)
    }

    /// Replace a static page, refreshing `updated_at`.
    pub async fn replace_static_page(
        &self,
        slug: &str,
        page: StaticPage,
    ) -> Result<StaticPageRecord, StoreError> {
        let conn = self.conn.lock().await;
        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM static_pages WHERE slug = ?1",
                params![slug],
                |row| row.get(0),
            )
            .optional()
            .context("look up static page for replace")?;
        let id = existing.ok_or(StoreError::NotFound)?;
        let record = StaticPageRecord {
            id,
            updated_at: now_ms(),
            page,
        };
        let body = serde_json::to_string(&record.page).context("serialize static page")?;
        conn.execute(
            "UPDATE static_pages SET body = ?2, updated_at = ?3 WHERE slug = ?1",
            params![slug, body, record.updated_at],
        )
        .context("replace static page")?;
        Ok(record)
    }

    pub async fn delete_static_page(&self, slug: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        delete_row(&conn, "DELETE FROM static_pages WHERE slug = ?1", slug, "delete static page")
    }

    // --- user profiles ---

    pub async fn find_user(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        let conn = self.conn.lock().await;
        let body: Option<String> = conn
            .query_row("SELECT body FROM users WHERE uid = ?1", params![uid], |row| row.get(0))
            .optional()
            .context("find user")?;
        body.map(|body| serde_json::from_str(&body).context("deserialize user profile"))
            .transpose()
            .map_err(StoreError::Backend)
    }

    /// Full-document upsert keyed by the identity provider subject.
    pub async fn save_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let body = serde_json::to_string(profile).context("serialize user profile")?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (uid, body) VALUES (?1, ?2)
             ON CONFLICT (uid) DO UPDATE SET body = excluded.body",
            params![profile.uid, body],
        )
        .context("save user")?;
        Ok(())
    }
}

fn insert_row(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
    action: &'static str,
) -> Result<(), StoreError> {
    match conn.execute(sql, params) {
        Ok(_) => Ok(()),
        Err(err) if is_conflict(&err) => Err(StoreError::AlreadyExists),
        Err(err) => Err(StoreError::Backend(anyhow::Error::new(err).context(action))),
    }
}

fn delete_row(
    conn: &Connection,
    sql: &str,
    key: &str,
    action: &'static str,
) -> Result<(), StoreError> {
    let affected = conn
        .execute(sql, params![key])
        .map_err(|err| StoreError::Backend(anyhow::Error::new(err).context(action)))?;
    if affected == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

fn is_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(info, _)
            if info.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
