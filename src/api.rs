use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::display::{time_ago, Tone};
use crate::feed::FeedService;
use crate::sentiment::{DominantSentiment, SentimentFilter, SentimentTriple};
use crate::sources::{self, SourceGroup};
use crate::topic::{transform_values, DisplayTopic};

pub const SAMPLE_DATA_HEADER: &str = "x-sample-data";

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedService>,
}

impl AppState {
    pub fn new(feed: FeedService) -> Self {
        Self {
            feed: Arc::new(feed),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/topics", get(list_topics))
        .route("/api/topics/{id}", get(get_topic))
        .route("/api/topics/{id}/sources", get(topic_sources))
        .route("/api/transform", post(transform_rows))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

#[derive(serde::Deserialize)]
struct PageQuery {
    #[serde(default)]
    page: Option<u32>,
}

#[derive(serde::Deserialize)]
struct SourcesQuery {
    #[serde(default)]
    sentiment: Option<String>,
}

/// Outlet group with its own breakdown.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupView {
    #[serde(flatten)]
    group: SourceGroup,
    sentiment: SentimentTriple,
    dominant: DominantSentiment,
}

impl From<SourceGroup> for GroupView {
    fn from(group: SourceGroup) -> Self {
        let sentiment = group.sentiment();
        Self {
            dominant: sentiment.dominant(),
            sentiment,
            group,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct TopicDetail {
    topic: DisplayTopic,
    dominant: DominantSentiment,
    tone: &'static Tone,
    /// Widths for the stacked bar, always summing to 100 (or all 0).
    bars: SentimentTriple,
    age: String,
    sources: Vec<GroupView>,
    using_sample_data: bool,
}

async fn list_topics(State(state): State<AppState>, Query(q): Query<PageQuery>) -> Response {
    let page = state.feed.load_page(q.page.unwrap_or(0)).await;
    let flag = if page.using_sample_data { "1" } else { "0" };
    let mut resp = Json(page).into_response();
    resp.headers_mut()
        .insert(SAMPLE_DATA_HEADER, HeaderValue::from_static(flag));
    resp
}

async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TopicDetail>, ApiError> {
    let (topic, using_sample_data) = find_topic(&state, &id).await?;
    let dominant = topic.dominant();
    let sources = topic.source_groups().into_iter().map(GroupView::from).collect();

    Ok(Json(TopicDetail {
        dominant,
        tone: dominant.label.tone(),
        bars: topic.sentiment.exact_hundred(),
        age: time_ago(topic.published_at, chrono::Utc::now()),
        sources,
        using_sample_data,
        topic,
    }))
}

async fn topic_sources(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<SourcesQuery>,
) -> Result<Json<Vec<GroupView>>, ApiError> {
    let filter: SentimentFilter = match q.sentiment.as_deref() {
        None => SentimentFilter::All,
        Some(raw) => raw
            .parse()
            .map_err(|e: anyhow::Error| ApiError::BadRequest(e.to_string()))?,
    };
    let (topic, _) = find_topic(&state, &id).await?;
    let groups = sources::filter_by_sentiment(filter, &topic.source_groups());
    Ok(Json(groups.into_iter().map(GroupView::from).collect()))
}

async fn transform_rows(Json(rows): Json<Vec<Value>>) -> Json<Vec<DisplayTopic>> {
    Json(transform_values(&rows))
}

async fn find_topic(state: &AppState, id: &str) -> Result<(DisplayTopic, bool), ApiError> {
    state
        .feed
        .load_topic(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("topic '{id}' not found")))
}
