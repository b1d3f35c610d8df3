use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use lingopress_shared::{
    ArticleFilter, ArticleRecord, ArticleSubmission, Category, CategoryRecord, FavoriteAction,
    Language, StaticPageRecord, StaticPageSubmission, SuggestedArticle, UserProfile,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ArticleQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub popular: Option<bool>,
    /// Drafts are hidden from listings unless explicitly requested.
    #[serde(default)]
    pub drafts: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ArticleListResponse {
    pub articles: Vec<ArticleRecord>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryRecord>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct PageListResponse {
    pub pages: Vec<StaticPageRecord>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub article_id: String,
    pub action: FavoriteAction,
}

// --- articles ---

pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleQuery>,
) -> Result<Json<ArticleListResponse>, ApiError> {
    let filter = ArticleFilter {
        category: query.category,
        subcategory: query.subcategory,
        language: query.language,
        search: query.search,
        featured: query.featured,
        popular: query.popular,
        include_drafts: query.drafts.unwrap_or(false),
    };
    let articles = state.service().list_articles(&filter).await?;
    Ok(Json(ArticleListResponse {
        total: articles.len(),
        articles,
    }))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleRecord>, ApiError> {
    Ok(Json(state.service().get_article(&slug).await?))
}

pub async fn create_article(
    State(state): State<AppState>,
    Json(submission): Json<ArticleSubmission>,
) -> Result<(StatusCode, Json<ArticleRecord>), ApiError> {
    let record = state.service().create_article(submission).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(submission): Json<ArticleSubmission>,
) -> Result<Json<ArticleRecord>, ApiError> {
    Ok(Json(state.service().update_article(&slug, submission).await?))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service().delete_article(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- categories ---

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>, ApiError> {
    let categories = state.service().list_categories().await?;
    Ok(Json(CategoryListResponse {
        total: categories.len(),
        categories,
    }))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryRecord>, ApiError> {
    Ok(Json(state.service().get_category(&slug).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(category): Json<Category>,
) -> Result<(StatusCode, Json<CategoryRecord>), ApiError> {
    let record = state.service().create_category(category).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(category): Json<Category>,
) -> Result<Json<CategoryRecord>, ApiError> {
    Ok(Json(state.service().update_category(&slug, category).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service().delete_category(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- static pages ---

pub async fn list_pages(
    State(state): State<AppState>,
) -> Result<Json<PageListResponse>, ApiError> {
    let pages = state.service().list_static_pages().await?;
    Ok(Json(PageListResponse {
        total: pages.len(),
        pages,
    }))
}

pub async fn get_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StaticPageRecord>, ApiError> {
    Ok(Json(state.service().get_static_page(&slug).await?))
}

pub async fn create_page(
    State(state): State<AppState>,
    Json(submission): Json<StaticPageSubmission>,
) -> Result<(StatusCode, Json<StaticPageRecord>), ApiError> {
    let record = state.service().create_static_page(submission).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(submission): Json<StaticPageSubmission>,
) -> Result<Json<StaticPageRecord>, ApiError> {
    Ok(Json(state.service().update_static_page(&slug, submission).await?))
}

pub async fn delete_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service().delete_static_page(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- user profiles ---

pub async fn get_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.service().get_user(&uid).await?))
}

pub async fn save_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.service().save_user(&uid, profile).await?))
}

pub async fn patch_favorites(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(request): Json<FavoriteRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile =
        state.service().set_favorite(&uid, &request.article_id, request.action).await?;
    Ok(Json(profile))
}

pub async fn add_suggestion(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(suggestion): Json<SuggestedArticle>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let profile = state.service().add_suggestion(&uid, suggestion).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}
