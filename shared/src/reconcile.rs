//! Translation reconciler: the cross-field invariant step of the pipeline.
//!
//! Enforces exact 1:1 correspondence between `availableLanguages` and the
//! keys of `translations`, upgrades legacy string-only content items to
//! structured sections, and backfills per-translation defaults. Expects a
//! submission that already went through `normalize::apply_defaults`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::model::{
    Article, ArticleSubmission, Author, ContentItem, ContentSection, Language, PageTranslation,
    StaticPage, StaticPageSubmission, Translation,
};
use crate::normalize::UNTITLED;

/// Section title given to upgraded bare-string content items.
pub const TEXT_SECTION_TITLE: &str = "Content";
/// Section title given to structured items that carry none.
pub const DEFAULT_SECTION_TITLE: &str = "Section";
/// Body text backfilled into sections that arrive without any.
pub const PLACEHOLDER_PARAGRAPH: &str = "Content coming soon.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageMismatch {
    /// Listed in `availableLanguages` but absent from `translations`.
    MissingTranslation(Language),
    /// Present in `translations` but not listed as available.
    NotListed(Language),
}

impl fmt::Display for LanguageMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageMismatch::MissingTranslation(lang) => {
                write!(f, "Language {lang} is listed as available but has no translation")
            },
            LanguageMismatch::NotListed(lang) => {
                write!(f, "Translation for {lang} exists but language is not listed as available")
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileError {
    pub mismatches: Vec<LanguageMismatch>,
}

impl std::error::Error for ReconcileError {}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, mismatch) in self.mismatches.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{mismatch}")?;
        }
        Ok(())
    }
}

/// Upgrade one submitted content item to its canonical section form.
/// A section never comes out with an empty paragraph: blank body text is
/// backfilled the same way a missing content list is.
pub fn upgrade_content_item(item: ContentItem) -> ContentSection {
    match item {
        ContentItem::Text(paragraph) => ContentSection {
            title: TEXT_SECTION_TITLE.to_string(),
            paragraph: non_empty_paragraph(Some(paragraph)),
            references: Vec::new(),
        },
        ContentItem::Section(draft) => ContentSection {
            title: draft
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SECTION_TITLE.to_string()),
            paragraph: non_empty_paragraph(draft.paragraph),
            references: draft.references.unwrap_or_default(),
        },
    }
}

fn non_empty_paragraph(paragraph: Option<String>) -> String {
    paragraph
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| PLACEHOLDER_PARAGRAPH.to_string())
}

fn placeholder_section() -> ContentSection {
    ContentSection {
        title: TEXT_SECTION_TITLE.to_string(),
        paragraph: PLACEHOLDER_PARAGRAPH.to_string(),
        references: Vec::new(),
    }
}

/// Check language/translation correspondence and build the canonical
/// article. All mismatches are reported together.
pub fn reconcile(sub: ArticleSubmission) -> Result<Article, ReconcileError> {
    // Deduplicate while preserving the submitted order.
    let mut seen = BTreeSet::new();
    let available: Vec<Language> = sub
        .available_languages
        .iter()
        .copied()
        .filter(|lang| seen.insert(*lang))
        .collect();

    let mut mismatches = Vec::new();
    for lang in &available {
        if !sub.translations.contains_key(lang) {
            mismatches.push(LanguageMismatch::MissingTranslation(*lang));
        }
    }
    for lang in sub.translations.keys() {
        if !seen.contains(lang) {
            mismatches.push(LanguageMismatch::NotListed(*lang));
        }
    }
    if !mismatches.is_empty() {
        return Err(ReconcileError { mismatches });
    }

    let mut translations = BTreeMap::new();
    for (lang, draft) in sub.translations {
        let content: Vec<ContentSection> = match draft.content {
            Some(items) if !items.is_empty() => {
                items.into_iter().map(upgrade_content_item).collect()
            },
            // Defensive backfill for callers that skip strict validation.
            _ => vec![placeholder_section()],
        };
        translations.insert(
            lang,
            Translation {
                title: draft.title,
                summary: draft.summary,
                keywords: draft.keywords.unwrap_or_default(),
                content,
            },
        );
    }

    Ok(Article {
        slug: sub.slug.unwrap_or_default(),
        title: sub.title.unwrap_or_else(|| UNTITLED.to_string()),
        category: sub.category.unwrap_or_else(|| "general".to_string()),
        subcategory: sub.subcategory.unwrap_or_else(|| "other".to_string()),
        author: sub.author.unwrap_or_else(Author::system),
        available_languages: available,
        translations,
        draft: sub.draft.unwrap_or(false),
        featured: sub.featured.unwrap_or(false),
        popular: sub.popular.unwrap_or(false),
        image_urls: sub.image_urls.unwrap_or_default(),
        image_descriptions: sub.image_descriptions.unwrap_or_default(),
    })
}

/// Static pages have no separate language list; reconciliation only
/// backfills per-translation keywords.
pub fn reconcile_page(sub: StaticPageSubmission) -> StaticPage {
    let translations = sub
        .translations
        .into_iter()
        .map(|(lang, draft)| {
            (
                lang,
                PageTranslation {
                    title: draft.title,
                    content: draft.content,
                    keywords: draft.keywords.unwrap_or_default(),
                },
            )
        })
        .collect();
    StaticPage {
        slug: sub.slug.unwrap_or_default(),
        translations,
    }
}
