//! Declarative shape checks for incoming submissions.
//!
//! Validation runs before any store access and reports *every* violated
//! field, not just the first, so a client can fix a whole form in one
//! round trip.

use std::fmt;

use serde::Serialize;

use crate::model::{
    ArticleSubmission, Category, ContentItem, StaticPageSubmission, SuggestedArticle,
};
use crate::slug;

/// Minimum trimmed length for a translation title.
pub const MIN_TITLE_LEN: usize = 2;
/// Minimum trimmed length for a translation summary.
pub const MIN_SUMMARY_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl std::error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (idx, violation) in self.violations.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Accumulates violations and turns into a `Result` at the end.
#[derive(Debug, Default)]
struct Checker {
    violations: Vec<FieldViolation>,
}

impl Checker {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.violations,
            })
        }
    }
}

/// Validate a raw article submission. Passes the object through untouched;
/// normalization happens afterwards.
pub fn validate_article(sub: &ArticleSubmission) -> Result<(), ValidationError> {
    let mut check = Checker::default();

    if let Some(slug) = &sub.slug {
        if !slug.trim().is_empty() && !slug::is_valid(slug) {
            check.push(
                "slug",
                "must be lowercase alphanumeric groups separated by single hyphens",
            );
        }
    }

    if sub.available_languages.is_empty() {
        check.push("availableLanguages", "at least one language is required");
    }

    for (lang, translation) in &sub.translations {
        let base = format!("translations.{lang}");
        let title = translation.title.trim();
        if title.is_empty() {
            check.push(format!("{base}.title"), "title is required");
        } else if title.chars().count() < MIN_TITLE_LEN {
            check.push(
                format!("{base}.title"),
                format!("title must be at least {MIN_TITLE_LEN} characters"),
            );
        }

        let summary = translation.summary.trim();
        if summary.is_empty() {
            check.push(format!("{base}.summary"), "summary is required");
        } else if summary.chars().count() < MIN_SUMMARY_LEN {
            check.push(
                format!("{base}.summary"),
                format!("summary must be at least {MIN_SUMMARY_LEN} characters"),
            );
        }

        match &translation.content {
            None => check.push(format!("{base}.content"), "content is required"),
            Some(items) if items.is_empty() => {
                check.push(format!("{base}.content"), "content must not be empty");
            },
            Some(items) => {
                for (idx, item) in items.iter().enumerate() {
                    let field = format!("{base}.content.{idx}.paragraph");
                    match item {
                        ContentItem::Text(text) if text.trim().is_empty() => {
                            check.push(field, "paragraph must not be empty");
                        },
                        ContentItem::Text(_) => {},
                        ContentItem::Section(draft) => match &draft.paragraph {
                            None => check.push(field, "paragraph is required"),
                            Some(paragraph) if paragraph.trim().is_empty() => {
                                check.push(field, "paragraph must not be empty");
                            },
                            Some(_) => {},
                        },
                    }
                }
            },
        }
    }

    check.finish()
}

/// Validate a category document: slug shape, at least one localized title,
/// and subcategory slugs well formed and unique within the parent.
pub fn validate_category(category: &Category) -> Result<(), ValidationError> {
    let mut check = Checker::default();

    if !category.slug.trim().is_empty() && !slug::is_valid(&category.slug) {
        check.push(
            "slug",
            "must be lowercase alphanumeric groups separated by single hyphens",
        );
    }

    if category.titles.values().all(|t| t.trim().is_empty()) {
        check.push("titles", "at least one localized title is required");
    }

    let mut seen = std::collections::BTreeSet::new();
    for (idx, sub) in category.subcategories.iter().enumerate() {
        let base = format!("subcategories.{idx}");
        if !slug::is_valid(&sub.slug) {
            check.push(format!("{base}.slug"), "invalid subcategory slug");
        } else if !seen.insert(sub.slug.as_str()) {
            check.push(
                format!("{base}.slug"),
                format!("duplicate subcategory slug '{}'", sub.slug),
            );
        }
    }

    check.finish()
}

/// Validate a static page submission.
pub fn validate_static_page(sub: &StaticPageSubmission) -> Result<(), ValidationError> {
    let mut check = Checker::default();

    if let Some(slug) = &sub.slug {
        if !slug.trim().is_empty() && !slug::is_valid(slug) {
            check.push(
                "slug",
                "must be lowercase alphanumeric groups separated by single hyphens",
            );
        }
    }

    if sub.translations.is_empty() {
        check.push("translations", "at least one translation is required");
    }

    for (lang, translation) in &sub.translations {
        let base = format!("translations.{lang}");
        if translation.title.trim().is_empty() {
            check.push(format!("{base}.title"), "title is required");
        }
        if translation.content.trim().is_empty() {
            check.push(format!("{base}.content"), "content is required");
        }
    }

    check.finish()
}

/// Validate a user-suggested article before appending it to the profile.
pub fn validate_suggestion(suggestion: &SuggestedArticle) -> Result<(), ValidationError> {
    let mut check = Checker::default();

    if suggestion.title.trim().is_empty() {
        check.push("title", "title is required");
    }
    if suggestion.content.is_empty() || suggestion.content.iter().all(|p| p.trim().is_empty()) {
        check.push("content", "at least one paragraph is required");
    }

    check.finish()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{ContentItem, Language, Subcategory, TranslationDraft};

    fn minimal_submission() -> ArticleSubmission {
        let mut translations = BTreeMap::new();
        translations.insert(
            Language::En,
            TranslationDraft {
                title: "Hi".to_string(),
                summary: "A summary here".to_string(),
                keywords: None,
                content: Some(vec![ContentItem::Text("text".to_string())]),
            },
        );
        ArticleSubmission {
            available_languages: vec![Language::En],
            translations,
            ..Default::default()
        }
    }

    #[test]
    fn minimal_submission_passes() {
        assert!(validate_article(&minimal_submission()).is_ok());
    }

    #[test]
    fn all_violations_are_reported_at_once() {
        let mut sub = minimal_submission();
        sub.slug = Some("Not A Slug".to_string());
        sub.available_languages.clear();
        let translation = sub.translations.get_mut(&Language::En).expect("en");
        translation.title.clear();
        translation.summary = "short".to_string();
        translation.content = Some(vec![]);

        let err = validate_article(&sub).expect_err("should fail");
        let fields: Vec<&str> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"slug"));
        assert!(fields.contains(&"availableLanguages"));
        assert!(fields.contains(&"translations.en.title"));
        assert!(fields.contains(&"translations.en.summary"));
        assert!(fields.contains(&"translations.en.content"));
        assert_eq!(err.violations.len(), 5);
    }

    #[test]
    fn missing_content_is_distinct_from_empty_content() {
        let mut sub = minimal_submission();
        sub.translations.get_mut(&Language::En).expect("en").content = None;
        let err = validate_article(&sub).expect_err("should fail");
        assert_eq!(err.violations[0].message, "content is required");
    }

    #[test]
    fn content_items_without_paragraphs_are_rejected() {
        let mut sub = minimal_submission();
        sub.translations.get_mut(&Language::En).expect("en").content = Some(vec![
            ContentItem::Section(crate::model::ContentSectionDraft {
                title: Some("Intro".to_string()),
                paragraph: None,
                references: None,
            }),
            ContentItem::Text("   ".to_string()),
            ContentItem::Section(crate::model::ContentSectionDraft {
                title: None,
                paragraph: Some("".to_string()),
                references: None,
            }),
        ]);

        let err = validate_article(&sub).expect_err("should fail");
        let fields: Vec<&str> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "translations.en.content.0.paragraph",
                "translations.en.content.1.paragraph",
                "translations.en.content.2.paragraph",
            ]
        );
    }

    #[test]
    fn blank_slug_is_left_for_the_normalizer() {
        let mut sub = minimal_submission();
        sub.slug = Some("   ".to_string());
        assert!(validate_article(&sub).is_ok());
    }

    #[test]
    fn duplicate_subcategory_slugs_are_rejected() {
        let mut titles = BTreeMap::new();
        titles.insert(Language::En, "Science".to_string());
        let category = Category {
            slug: "science".to_string(),
            titles,
            subcategories: vec![
                Subcategory {
                    slug: "physics".to_string(),
                    ..Default::default()
                },
                Subcategory {
                    slug: "physics".to_string(),
                    ..Default::default()
                },
            ],
        };
        let err = validate_category(&category).expect_err("should fail");
        assert!(err.to_string().contains("duplicate subcategory slug"));
    }
}
