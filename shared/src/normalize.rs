//! Field normalizer: fills every gap a submission may legally leave open.
//!
//! `apply_defaults` is pure apart from the timestamp-based slug fallback
//! (only reachable when a submission carries no usable title at all) and
//! is idempotent: running it twice yields the same object as once.

use chrono::Utc;

use crate::model::{ArticleSubmission, Author, Language, StaticPageSubmission};
use crate::slug;

/// Injected when a submission arrives with no images at all.
pub const PLACEHOLDER_IMAGE_URL: &str = "/assets/images/article-placeholder.png";
/// Display title of last resort.
pub const UNTITLED: &str = "Untitled Article";

/// Resolve the display title: explicit title → English translation title →
/// first available translation title (in `availableLanguages` order).
pub fn display_title(sub: &ArticleSubmission) -> Option<String> {
    if let Some(title) = &sub.title {
        if !title.trim().is_empty() {
            return Some(title.trim().to_string());
        }
    }
    if let Some(en) = sub.translations.get(&Language::En) {
        if !en.title.trim().is_empty() {
            return Some(en.title.trim().to_string());
        }
    }
    for lang in &sub.available_languages {
        if let Some(translation) = sub.translations.get(lang) {
            if !translation.title.trim().is_empty() {
                return Some(translation.title.trim().to_string());
            }
        }
    }
    None
}

/// Apply the defaulting rules, in order:
///
/// 1. derive a missing slug from the best available title (timestamp
///    fallback when no title exists anywhere)
/// 2. promote the legacy singular `imageUrl` into `imageUrls`
/// 3. inject one placeholder image when `imageUrls` ends up empty
/// 4. pad `imageDescriptions` to the length of `imageUrls`
/// 5. default blank category/subcategory to "general"/"other"
/// 6. default a missing author to the system author
/// 7. compute the top-level display title
pub fn apply_defaults(mut sub: ArticleSubmission) -> ArticleSubmission {
    // 1. slug
    let needs_slug = sub.slug.as_deref().map_or(true, |s| s.trim().is_empty());
    if needs_slug {
        let derived = display_title(&sub).map(|t| slug::derive(&t)).unwrap_or_default();
        sub.slug = Some(if derived.is_empty() {
            format!("article-{}", Utc::now().timestamp_millis())
        } else {
            derived
        });
    }

    // 2. legacy single-image field
    if sub.image_urls.is_none() {
        if let Some(url) = sub.image_url.take() {
            sub.image_urls = Some(vec![url]);
        }
    }
    sub.image_url = None;

    // 3. placeholder image
    let image_urls = match sub.image_urls.take() {
        Some(urls) if !urls.is_empty() => urls,
        _ => vec![PLACEHOLDER_IMAGE_URL.to_string()],
    };

    // 4. pad descriptions, never truncate
    let title_for_alt = display_title(&sub).unwrap_or_else(|| UNTITLED.to_string());
    let mut descriptions = sub.image_descriptions.take().unwrap_or_default();
    while descriptions.len() < image_urls.len() {
        descriptions.push(format!("Image {} for {}", descriptions.len() + 1, title_for_alt));
    }
    sub.image_urls = Some(image_urls);
    sub.image_descriptions = Some(descriptions);

    // 5. category defaults
    if sub.category.as_deref().map_or(true, |c| c.trim().is_empty()) {
        sub.category = Some("general".to_string());
    }
    if sub.subcategory.as_deref().map_or(true, |c| c.trim().is_empty()) {
        sub.subcategory = Some("other".to_string());
    }

    // 6. author default
    if sub.author.is_none() {
        sub.author = Some(Author::system());
    }

    // 7. display title
    if sub.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        sub.title = Some(display_title(&sub).unwrap_or_else(|| UNTITLED.to_string()));
    }

    sub
}

/// Static pages share only the slug rule: derive it from the English
/// title, then any translation title, then a timestamp.
pub fn apply_page_defaults(mut sub: StaticPageSubmission) -> StaticPageSubmission {
    let needs_slug = sub.slug.as_deref().map_or(true, |s| s.trim().is_empty());
    if needs_slug {
        let title = sub
            .translations
            .get(&Language::En)
            .map(|t| t.title.clone())
            .or_else(|| sub.translations.values().next().map(|t| t.title.clone()))
            .unwrap_or_default();
        let derived = slug::derive(&title);
        sub.slug = Some(if derived.is_empty() {
            format!("page-{}", Utc::now().timestamp_millis())
        } else {
            derived
        });
    }
    sub
}
