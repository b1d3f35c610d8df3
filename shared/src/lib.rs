//! Domain core for the LingoPress multilingual content platform.
//!
//! Everything here is HTTP-agnostic: the article data model, the
//! normalization pipeline (validate → normalize → reconcile), and the
//! document store the pipeline persists into. The backend crate wires
//! these into an axum API.

pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod service;
pub mod slug;
pub mod store;
pub mod validate;

pub use model::{
    Article, ArticleSubmission, Author, Category, ContentItem, ContentSection,
    ContentSectionDraft, FavoriteAction, Language, PageTranslation, PageTranslationDraft,
    StaticPage, StaticPageSubmission, Subcategory, SuggestedArticle, Translation,
    TranslationDraft, UserProfile,
};
pub use service::{ArticleFilter, ContentError, ContentService};
pub use store::{ArticleRecord, CategoryRecord, DocumentStore, StaticPageRecord, StoreError};
pub use validate::{FieldViolation, ValidationError};
