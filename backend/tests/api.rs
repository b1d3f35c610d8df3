//! Router-level tests exercising the HTTP surface end to end against an
//! in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use lingopress_backend::{routes, state::AppState};
use lingopress_shared::DocumentStore;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_router() -> Router {
    let store = DocumentStore::open_in_memory().expect("open in-memory store");
    routes::create_router(AppState::with_store(store))
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => Request::builder().method(method).uri(uri).body(Body::empty()).expect("request"),
    };
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn article_body(slug: Option<&str>) -> Value {
    let mut body = json!({
        "availableLanguages": ["en"],
        "translations": {
            "en": {
                "title": "Hi",
                "summary": "A summary here",
                "content": [{"paragraph": "text"}]
            }
        }
    });
    if let Some(slug) = slug {
        body["slug"] = json!(slug);
    }
    body
}

#[tokio::test]
async fn create_normalizes_and_fetch_round_trips() {
    let router = test_router();

    let (status, created) = send(&router, "POST", "/articles", Some(article_body(None))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "hi");
    assert_eq!(created["category"], "general");
    assert_eq!(created["subcategory"], "other");
    assert_eq!(created["imageUrls"].as_array().map(Vec::len), Some(1));
    assert_eq!(created["imageDescriptions"].as_array().map(Vec::len), Some(1));
    assert_eq!(created["translations"]["en"]["content"][0]["title"], "Section");

    let (status, fetched) = send(&router, "GET", "/articles/hi", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn duplicate_slug_returns_conflict() {
    let router = test_router();

    let (status, _) =
        send(&router, "POST", "/articles", Some(article_body(Some("my-article")))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        send(&router, "POST", "/articles", Some(article_body(Some("my-article")))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().expect("message").contains("already exists"));

    let (_, listing) = send(&router, "GET", "/articles", None).await;
    assert_eq!(listing["total"], 1);
}

#[tokio::test]
async fn invalid_payload_enumerates_every_violation() {
    let router = test_router();

    let body = json!({
        "availableLanguages": [],
        "translations": {
            "en": {"title": "", "summary": "short", "content": []}
        }
    });
    let (status, response) = send(&router, "POST", "/articles", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = response["message"].as_str().expect("message");
    assert!(message.contains("availableLanguages"));
    assert!(message.contains("translations.en.title"));
    assert!(message.contains("translations.en.summary"));
    assert!(message.contains("translations.en.content"));
}

#[tokio::test]
async fn language_mismatch_is_a_bad_request() {
    let router = test_router();

    let body = json!({
        "availableLanguages": ["en", "fr"],
        "translations": {
            "en": {
                "title": "Hi",
                "summary": "A summary here",
                "content": ["Hello world"]
            }
        }
    });
    let (status, response) = send(&router, "POST", "/articles", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["message"],
        "Language fr is listed as available but has no translation"
    );
}

#[tokio::test]
async fn update_and_delete_unknown_slug_return_not_found() {
    let router = test_router();

    let (status, body) =
        send(&router, "PUT", "/articles/ghost", Some(article_body(Some("ghost")))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().expect("message").contains("not found"));

    let (status, _) = send(&router, "DELETE", "/articles/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The failed update must not have created anything.
    let (_, listing) = send(&router, "GET", "/articles", None).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn slug_change_on_update_is_rejected() {
    let router = test_router();

    send(&router, "POST", "/articles", Some(article_body(Some("stable")))).await;
    let (status, body) =
        send(&router, "PUT", "/articles/stable", Some(article_body(Some("renamed")))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().expect("message").contains("immutable"));
}

#[tokio::test]
async fn drafts_are_hidden_unless_requested() {
    let router = test_router();

    let mut draft = article_body(Some("hidden"));
    draft["draft"] = json!(true);
    send(&router, "POST", "/articles", Some(draft)).await;
    send(&router, "POST", "/articles", Some(article_body(Some("visible")))).await;

    let (_, public) = send(&router, "GET", "/articles", None).await;
    assert_eq!(public["total"], 1);
    assert_eq!(public["articles"][0]["slug"], "visible");

    let (_, admin) = send(&router, "GET", "/articles?drafts=true", None).await;
    assert_eq!(admin["total"], 2);
}

#[tokio::test]
async fn listing_filters_by_category_and_language() {
    let router = test_router();

    let mut science = article_body(Some("physics-intro"));
    science["category"] = json!("science");
    send(&router, "POST", "/articles", Some(science)).await;

    let mut french = json!({
        "slug": "histoire",
        "availableLanguages": ["fr"],
        "translations": {
            "fr": {
                "title": "Histoire",
                "summary": "Un résumé ici",
                "content": ["Bonjour"]
            }
        }
    });
    french["category"] = json!("history");
    send(&router, "POST", "/articles", Some(french)).await;

    let (_, by_category) = send(&router, "GET", "/articles?category=science", None).await;
    assert_eq!(by_category["total"], 1);
    assert_eq!(by_category["articles"][0]["slug"], "physics-intro");

    let (_, by_language) = send(&router, "GET", "/articles?language=fr", None).await;
    assert_eq!(by_language["total"], 1);
    assert_eq!(by_language["articles"][0]["slug"], "histoire");
}

#[tokio::test]
async fn favorites_have_set_semantics_over_http() {
    let router = test_router();

    let (status, _) = send(
        &router,
        "POST",
        "/users/subject-1",
        Some(json!({"displayName": "Reader", "email": "reader@example.org"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let add = json!({"articleId": "hi", "action": "add"});
    let (status, profile) =
        send(&router, "PATCH", "/users/subject-1/favorites", Some(add.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["favorites"], json!(["hi"]));

    // Redundant add stays a single entry.
    let (_, profile) = send(&router, "PATCH", "/users/subject-1/favorites", Some(add)).await;
    assert_eq!(profile["favorites"], json!(["hi"]));

    let remove = json!({"articleId": "hi", "action": "remove"});
    let (status, profile) =
        send(&router, "PATCH", "/users/subject-1/favorites", Some(remove.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["favorites"], json!([]));

    // Redundant remove is a no-op, not an error.
    let (status, _) = send(&router, "PATCH", "/users/subject-1/favorites", Some(remove)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn suggestions_append_to_the_profile() {
    let router = test_router();

    send(&router, "POST", "/users/subject-1", Some(json!({"displayName": "Reader"}))).await;
    let suggestion = json!({
        "title": "Cover the water cycle",
        "language": "en",
        "content": ["It rains.", "It evaporates."]
    });
    let (status, profile) =
        send(&router, "POST", "/users/subject-1/suggestions", Some(suggestion)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(profile["suggestedArticles"][0]["title"], "Cover the water cycle");

    let (status, _) = send(
        &router,
        "POST",
        "/users/unknown/suggestions",
        Some(json!({"title": "x y z", "language": "en", "content": ["p"]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_pages_full_cycle() {
    let router = test_router();

    let page = json!({
        "translations": {
            "en": {"title": "About Us", "content": "Who we are."}
        }
    });
    let (status, created) = send(&router, "POST", "/pages", Some(page.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "about-us");

    let (status, _) = send(&router, "POST", "/pages", Some(page)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let updated = json!({
        "translations": {
            "en": {"title": "About Us", "content": "Updated."}
        }
    });
    let (status, body) = send(&router, "PUT", "/pages/about-us", Some(updated)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translations"]["en"]["content"], "Updated.");

    let (status, _) = send(&router, "DELETE", "/pages/about-us", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&router, "GET", "/pages/about-us", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn categories_full_cycle() {
    let router = test_router();

    let category = json!({
        "slug": "science",
        "titles": {"en": "Science", "fr": "Sciences"},
        "subcategories": [
            {"slug": "physics", "titles": {"en": "Physics"}},
            {"slug": "biology", "titles": {"en": "Biology"}}
        ]
    });
    let (status, created) = send(&router, "POST", "/categories", Some(category.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "science");

    let (status, _) = send(&router, "POST", "/categories", Some(category)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let duplicate_subs = json!({
        "slug": "arts",
        "titles": {"en": "Arts"},
        "subcategories": [
            {"slug": "music", "titles": {"en": "Music"}},
            {"slug": "music", "titles": {"en": "Music again"}}
        ]
    });
    let (status, body) = send(&router, "POST", "/categories", Some(duplicate_subs)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().expect("message").contains("duplicate subcategory"));

    let (_, listing) = send(&router, "GET", "/categories", None).await;
    assert_eq!(listing["total"], 1);
}
