//! Content service: sequences the pipeline for every write and performs
//! the in-memory listing/filtering for reads.
//!
//! Write path: validate → apply defaults → reconcile → uniqueness guard →
//! persist. Validation and reconciliation errors are deterministic and
//! never retried; store failures are propagated as [`ContentError::Store`]
//! and logged where they surface.

use std::sync::Arc;

use thiserror::Error;

use crate::model::{
    Article, ArticleSubmission, Category, FavoriteAction, Language, StaticPageSubmission,
    SuggestedArticle, UserProfile,
};
use crate::reconcile::{self, ReconcileError};
use crate::store::{
    ArticleRecord, CategoryRecord, DocumentStore, StaticPageRecord, StoreError,
};
use crate::validate::{self, FieldViolation, ValidationError};
use crate::{normalize, slug};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Invariant(#[from] ReconcileError),
    #[error("{kind} '{key}' already exists")]
    Conflict { kind: &'static str, key: String },
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },
    #[error("document store failure")]
    Store(#[source] anyhow::Error),
}

impl ContentError {
    fn from_store(err: StoreError, kind: &'static str, key: &str) -> Self {
        match err {
            StoreError::NotFound => ContentError::NotFound {
                kind,
                key: key.to_string(),
            },
            StoreError::AlreadyExists => ContentError::Conflict {
                kind,
                key: key.to_string(),
            },
            StoreError::Backend(err) => {
                tracing::error!("document store failure for {kind} '{key}': {err:#}");
                ContentError::Store(err)
            },
        }
    }

    fn immutable_slug() -> Self {
        ContentError::Validation(ValidationError {
            violations: vec![FieldViolation {
                field: "slug".to_string(),
                message: "slug is immutable after creation".to_string(),
            }],
        })
    }
}

/// Filters applied to article listings. All are conjunctive; absent
/// fields match everything. Drafts are hidden unless `include_drafts`.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub language: Option<Language>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub popular: Option<bool>,
    pub include_drafts: bool,
}

impl ArticleFilter {
    fn matches(&self, article: &Article) -> bool {
        if article.draft && !self.include_drafts {
            return false;
        }
        if let Some(category) = &self.category {
            if !article.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(subcategory) = &self.subcategory {
            if !article.subcategory.eq_ignore_ascii_case(subcategory) {
                return false;
            }
        }
        if let Some(language) = self.language {
            if !article.available_languages.contains(&language) {
                return false;
            }
        }
        if let Some(featured) = self.featured {
            if article.featured != featured {
                return false;
            }
        }
        if let Some(popular) = self.popular {
            if article.popular != popular {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            let needle = needle.trim().to_lowercase();
            if !needle.is_empty() && !search_matches(article, &needle) {
                return false;
            }
        }
        true
    }
}

/// Case-insensitive substring scan over the display title and every
/// translation's title, summary and keywords.
fn search_matches(article: &Article, needle: &str) -> bool {
    if article.title.to_lowercase().contains(needle) {
        return true;
    }
    article.translations.values().any(|translation| {
        translation.title.to_lowercase().contains(needle)
            || translation.summary.to_lowercase().contains(needle)
            || translation.keywords.iter().any(|k| k.to_lowercase().contains(needle))
    })
}

pub struct ContentService {
    store: Arc<DocumentStore>,
}

impl ContentService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    // --- articles ---

    pub async fn create_article(
        &self,
        submission: ArticleSubmission,
    ) -> Result<ArticleRecord, ContentError> {
        validate::validate_article(&submission)?;
        let normalized = normalize::apply_defaults(submission);
        let article = reconcile::reconcile(normalized)?;

        // Uniqueness guard: precise conflict error before any write. The
        // store's primary key closes the remaining race window.
        let slug = article.slug.clone();
        if self
            .store
            .find_article(&slug)
            .await
            .map_err(|err| ContentError::from_store(err, "article", &slug))?
            .is_some()
        {
            return Err(ContentError::Conflict {
                kind: "article",
                key: slug,
            });
        }

        self.store
            .insert_article(article)
            .await
            .map_err(|err| ContentError::from_store(err, "article", &slug))
    }

    pub async fn update_article(
        &self,
        slug: &str,
        mut submission: ArticleSubmission,
    ) -> Result<ArticleRecord, ContentError> {
        if let Some(submitted) = submission.slug.as_deref() {
            if !submitted.trim().is_empty() && submitted != slug {
                return Err(ContentError::immutable_slug());
            }
        }
        submission.slug = Some(slug.to_string());

        validate::validate_article(&submission)?;
        let normalized = normalize::apply_defaults(submission);
        let article = reconcile::reconcile(normalized)?;

        self.store
            .replace_article(slug, article)
            .await
            .map_err(|err| ContentError::from_store(err, "article", slug))
    }

    pub async fn get_article(&self, slug: &str) -> Result<ArticleRecord, ContentError> {
        self.store
            .find_article(slug)
            .await
            .map_err(|err| ContentError::from_store(err, "article", slug))?
            .ok_or_else(|| ContentError::NotFound {
                kind: "article",
                key: slug.to_string(),
            })
    }

    pub async fn delete_article(&self, slug: &str) -> Result<(), ContentError> {
        self.store
            .delete_article(slug)
            .await
            .map_err(|err| ContentError::from_store(err, "article", slug))
    }

    /// Fetch the whole collection and filter in memory. Fine at the data
    /// volumes this runs at; no pagination.
    pub async fn list_articles(
        &self,
        filter: &ArticleFilter,
    ) -> Result<Vec<ArticleRecord>, ContentError> {
        let records = self.store.list_articles().await.map_err(|err| {
            ContentError::from_store(err, "article", "*")
        })?;
        Ok(records.into_iter().filter(|record| filter.matches(&record.article)).collect())
    }

    // --- categories ---

    pub async fn create_category(
        &self,
        mut category: Category,
    ) -> Result<CategoryRecord, ContentError> {
        if category.slug.trim().is_empty() {
            let derived = category
                .titles
                .get(&Language::En)
                .or_else(|| category.titles.values().next())
                .map(|title| slug::derive(title))
                .unwrap_or_default();
            category.slug = derived;
        }
        validate::validate_category(&category)?;

        let key = category.slug.clone();
        if self
            .store
            .find_category(&key)
            .await
            .map_err(|err| ContentError::from_store(err, "category", &key))?
            .is_some()
        {
            return Err(ContentError::Conflict {
                kind: "category",
                key,
            });
        }
        self.store
            .insert_category(category)
            .await
            .map_err(|err| ContentError::from_store(err, "category", &key))
    }

    pub async fn update_category(
        &self,
        slug: &str,
        mut category: Category,
    ) -> Result<CategoryRecord, ContentError> {
        if !category.slug.trim().is_empty() && category.slug != slug {
            return Err(ContentError::immutable_slug());
        }
        category.slug = slug.to_string();
        validate::validate_category(&category)?;
        self.store
            .replace_category(slug, category)
            .await
            .map_err(|err| ContentError::from_store(err, "category", slug))
    }

    pub async fn get_category(&self, slug: &str) -> Result<CategoryRecord, ContentError> {
        self.store
            .find_category(slug)
            .await
            .map_err(|err| ContentError::from_store(err, "category", slug))?
            .ok_or_else(|| ContentError::NotFound {
                kind: "category",
                key: slug.to_string(),
            })
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryRecord>, ContentError> {
        self.store
            .list_categories()
            .await
            .map_err(|err| ContentError::from_store(err, "category", "*"))
    }

    pub async fn delete_category(&self, slug: &str) -> Result<(), ContentError> {
        self.store
            .delete_category(slug)
            .await
            .map_err(|err| ContentError::from_store(err, "category", slug))
    }

    // --- static pages ---

    pub async fn create_static_page(
        &self,
        submission: StaticPageSubmission,
    ) -> Result<StaticPageRecord, ContentError> {
        validate::validate_static_page(&submission)?;
        let normalized = normalize::apply_page_defaults(submission);
        let page = reconcile::reconcile_page(normalized);

        let key = page.slug.clone();
        if self
            .store
            .find_static_page(&key)
            .await
            .map_err(|err| ContentError::from_store(err, "page", &key))?
            .is_some()
        {
            return Err(ContentError::Conflict {
                kind: "page",
                key,
            });
        }
        self.store
            .insert_static_page(page)
            .await
            .map_err(|err| ContentError::from_store(err, "page", &key))
    }

    pub async fn update_static_page(
        &self,
        slug: &str,
        mut submission: StaticPageSubmission,
    ) -> Result<StaticPageRecord, ContentError> {
        if let Some(submitted) = submission.slug.as_deref() {
            if !submitted.trim().is_empty() && submitted != slug {
                return Err(ContentError::immutable_slug());
            }
        }
        submission.slug = Some(slug.to_string());
        validate::validate_static_page(&submission)?;
        let page = reconcile::reconcile_page(submission);
        self.store
            .replace_static_page(slug, page)
            .await
            .map_err(|err| ContentError::from_store(err, "page", slug))
    }

    pub async fn get_static_page(&self, slug: &str) -> Result<StaticPageRecord, ContentError> {
        self.store
            .find_static_page(slug)
            .await
            .map_err(|err| ContentError::from_store(err, "page", slug))?
            .ok_or_else(|| ContentError::NotFound {
                kind: "page",
                key: slug.to_string(),
            })
    }

    pub async fn list_static_pages(&self) -> Result<Vec<StaticPageRecord>, ContentError> {
        self.store
            .list_static_pages()
            .await
            .map_err(|err| ContentError::from_store(err, "page", "*"))
    }

    pub async fn delete_static_page(&self, slug: &str) -> Result<(), ContentError> {
        self.store
            .delete_static_page(slug)
            .await
            .map_err(|err| ContentError::from_store(err, "page", slug))
    }

    // --- user profiles ---

    pub async fn get_user(&self, uid: &str) -> Result<UserProfile, ContentError> {
        self.store
            .find_user(uid)
            .await
            .map_err(|err| ContentError::from_store(err, "user", uid))?
            .ok_or_else(|| ContentError::NotFound {
                kind: "user",
                key: uid.to_string(),
            })
    }

    /// Full-profile upsert; the path uid wins over whatever the body says.
    pub async fn save_user(
        &self,
        uid: &str,
        mut profile: UserProfile,
    ) -> Result<UserProfile, ContentError> {
        profile.uid = uid.to_string();
        self.store
            .save_user(&profile)
            .await
            .map_err(|err| ContentError::from_store(err, "user", uid))?;
        Ok(profile)
    }

    /// Add or remove a favorite with set semantics: redundant operations
    /// are no-ops, never errors.
    pub async fn set_favorite(
        &self,
        uid: &str,
        article_id: &str,
        action: FavoriteAction,
    ) -> Result<UserProfile, ContentError> {
        let mut profile = self.get_user(uid).await?;
        match action {
            FavoriteAction::Add => {
                profile.favorites.insert(article_id.to_string());
            },
            FavoriteAction::Remove => {
                profile.favorites.remove(article_id);
            },
        }
        self.store
            .save_user(&profile)
            .await
            .map_err(|err| ContentError::from_store(err, "user", uid))?;
        Ok(profile)
    }

    pub async fn add_suggestion(
        &self,
        uid: &str,
        suggestion: SuggestedArticle,
    ) -> Result<UserProfile, ContentError> {
        validate::validate_suggestion(&suggestion)?;
        let mut profile = self.get_user(uid).await?;
        profile.suggested_articles.push(suggestion);
        self.store
            .save_user(&profile)
            .await
            .map_err(|err| ContentError::from_store(err, "user", uid))?;
        Ok(profile)
    }
}
