//! Wire and canonical data shapes for articles, categories, static pages
//! and user profiles.
//!
//! Submissions (`*Submission`, `*Draft`) mirror what clients send: almost
//! everything optional, legacy fields still accepted. Canonical types
//! (`Article`, `Translation`, `ContentSection`) are what the pipeline
//! produces and the store persists.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of languages the platform publishes in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
    Es,
    De,
    Ar,
}

impl Language {
    pub const ALL: [Language; 5] =
        [Language::En, Language::Fr, Language::Es, Language::De, Language::Ar];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::De => "de",
            Language::Ar => "ar",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Author {
    pub uid: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Author {
    /// Fallback author stamped on submissions that carry none.
    pub fn system() -> Self {
        Author {
            uid: "system".to_string(),
            display_name: "System".to_string(),
            photo_url: None,
        }
    }
}

/// One body-content item as submitted. Legacy clients send a bare string
/// where newer ones send a structured section; the reconciler upgrades
/// both to [`ContentSection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentItem {
    Text(String),
    Section(ContentSectionDraft),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSectionDraft {
    pub title: Option<String>,
    pub paragraph: Option<String>,
    pub references: Option<Vec<String>>,
}

/// Canonical body-content section: one titled block of paragraph text,
/// optionally with citation strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSection {
    pub title: String,
    pub paragraph: String,
    pub references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationDraft {
    pub title: String,
    pub summary: String,
    pub keywords: Option<Vec<String>>,
    pub content: Option<Vec<ContentItem>>,
}

/// Canonical per-language translation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub title: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub content: Vec<ContentSection>,
}

/// Raw article payload as received from clients. The singular `imageUrl`
/// field is the legacy single-image shape and is promoted into
/// `imageUrls` during normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleSubmission {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub author: Option<Author>,
    pub available_languages: Vec<Language>,
    pub translations: BTreeMap<Language, TranslationDraft>,
    pub draft: Option<bool>,
    pub featured: Option<bool>,
    pub popular: Option<bool>,
    pub image_url: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub image_descriptions: Option<Vec<String>>,
}

/// Fully normalized article. Invariants (enforced by the pipeline, relied
/// on by everything downstream):
/// - `available_languages` is non-empty, deduplicated, and matches the
///   key set of `translations` exactly
/// - `image_urls` is non-empty and `image_descriptions` has the same length
/// - every translation has at least one content section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub subcategory: String,
    pub author: Author,
    pub available_languages: Vec<Language>,
    pub translations: BTreeMap<Language, Translation>,
    pub draft: bool,
    pub featured: bool,
    pub popular: bool,
    pub image_urls: Vec<String>,
    pub image_descriptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subcategory {
    pub slug: String,
    pub titles: BTreeMap<Language, String>,
}

/// A category with localized display names and its nested subcategories.
/// Subcategory slugs are unique within the parent only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub slug: String,
    pub titles: BTreeMap<Language, String>,
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageTranslationDraft {
    pub title: String,
    pub content: String,
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTranslation {
    pub title: String,
    pub content: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticPageSubmission {
    pub slug: Option<String>,
    pub translations: BTreeMap<Language, PageTranslationDraft>,
}

/// Canonical static page body (the record adds slug + timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPage {
    pub slug: String,
    pub translations: BTreeMap<Language, PageTranslation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedArticle {
    pub title: String,
    pub language: Language,
    pub content: Vec<String>,
}

/// Per-user profile document, keyed by the identity provider's subject id.
/// Favorites use set semantics: redundant add/remove is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub favorites: BTreeSet<String>,
    pub suggested_articles: Vec<SuggestedArticle>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteAction {
    Add,
    Remove,
}
