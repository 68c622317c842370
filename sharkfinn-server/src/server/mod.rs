mod config;

use crate::storage::{Fixtures, Repository, StorageError, Store};
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware;
use axum::response::{IntoResponse, Response as AxumResponse};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{Method, StatusCode, header},
    routing::{any, get, patch, post},
};
pub use config::{AppConfig, ConfigError, DEFAULT_PORT};
use sharkfinn_shared::api::{
    self, ActivityBlockDto, ChildDto, ErrorBody, HealthDto, RedemptionDto, RewardDto, SessionDto,
    SocialStoryDto, VisualScheduleDto,
};
use sharkfinn_shared::domain::{self, DEFAULT_CHILD_AGE, DocumentError};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info_span;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Fixed for the lifetime of the state: either the live store or fixtures.
    pub repo: Arc<dyn Repository>,
}

impl AppState {
    pub fn new(config: AppConfig, repo: Arc<dyn Repository>) -> Self {
        Self { config, repo }
    }

    /// Picks the repository from the configuration. In live mode the schema
    /// bootstrap is started in the background; its failure is logged and the
    /// server keeps running.
    pub fn from_config(config: AppConfig) -> Self {
        let repo: Arc<dyn Repository> = match config.database_url() {
            Some(url) => {
                tracing::info!(database = %url, "live mode: database configured");
                let store = Store::open_sqlite(url, config.pool_size);
                tokio::spawn(run_bootstrap(store.clone()));
                Arc::new(store)
            }
            None => {
                tracing::warn!("static mode: no DATABASE_URL, serving sample data");
                Arc::new(Fixtures)
            }
        };
        Self::new(config, repo)
    }

    fn require_db(&self) -> Result<(), AppError> {
        if self.repo.has_db() {
            Ok(())
        } else {
            Err(AppError::NotImplemented)
        }
    }
}

/// Runs the schema bootstrap once, logging instead of propagating failures.
pub async fn run_bootstrap(store: Store) {
    match store.bootstrap().await {
        Ok(0) => tracing::info!("bootstrap: schema ready"),
        Ok(seeded) => tracing::info!(seeded, "bootstrap: schema ready, default rewards seeded"),
        Err(e) => tracing::error!(error = %e, "DB bootstrap error"),
    }
}

#[derive(Clone, Debug)]
struct ReqId(pub String);

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/health", get(api_health))
        .route("/api/children", get(api_list_children).post(api_create_child))
        .route("/api/children/{id}", get(api_get_child))
        .route("/api/sessions", post(api_create_session))
        .route("/api/sessions/{id}", patch(api_update_session))
        .route("/api/activity-blocks", post(api_create_activity_block))
        .route(
            "/api/social-stories",
            get(api_list_social_stories).post(api_create_social_story),
        )
        .route(
            "/api/visual-schedules",
            get(api_list_visual_schedules).post(api_create_visual_schedule),
        )
        .route("/api/rewards", get(api_list_rewards))
        .route("/api/rewards/redeem", post(api_redeem_reward))
        .route("/api/{*rest}", any(api_not_found));

    // Trace with request context (method, path, request_id)
    let trace = TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
        let request_id = req
            .extensions()
            .get::<ReqId>()
            .map(|r| r.0.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        info_span!(
            "request",
            method = %req.method(),
            path = %req.uri().path(),
            request_id = %request_id,
        )
    });

    let static_dir = &state.config.static_dir;
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let cors = match &state.config.cors_origin {
        Some(origin) => {
            let hv = header::HeaderValue::from_str(origin)
                .unwrap_or(header::HeaderValue::from_static("http://localhost:5173"));
            CorsLayer::new()
                .allow_origin(hv)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE])
        }
        None => CorsLayer::permissive(),
    };

    api.fallback_service(spa)
        .with_state(state)
        .layer(trace)
        .layer(cors)
        .layer(middleware::from_fn(add_security_headers))
        .layer(middleware::from_fn(add_request_id))
}

async fn add_request_id(
    mut req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> AxumResponse {
    let hdr = HeaderName::from_static("x-request-id");
    // Use provided x-request-id if present, else generate
    let rid = req
        .headers()
        .get(&hdr)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(ReqId(rid.clone()));
    let mut resp = next.run(req).await;
    if let Ok(hv) = HeaderValue::from_str(&rid) {
        resp.headers_mut().insert(hdr, hv);
    }
    resp
}

async fn add_security_headers(
    req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> AxumResponse {
    let is_api = req.uri().path().starts_with("/api/");
    let mut resp = next.run(req).await;

    let headers = resp.headers_mut();
    headers.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("SAMEORIGIN"),
    );
    headers.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("no-referrer"),
    );

    // API answers reflect live data; never cache them
    if is_api {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, private"),
        );
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    }

    resp
}

const SAMPLE_CHILD_ID: i32 = 1;

fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .map_err(|_| AppError::bad_request("invalid id"))
}

/// Unwraps a JSON body. A request without a JSON content type carries no
/// fields and is treated as an empty object.
fn json_body<T: Default>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match body {
        Ok(Json(v)) => Ok(v),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(e) => Err(AppError::bad_request(e.body_text())),
    }
}

/// A required text field: present and not just whitespace.
fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

async fn api_health(State(state): State<AppState>) -> Result<Json<HealthDto>, AppError> {
    Ok(Json(state.repo.health().await?))
}

async fn api_list_children(State(state): State<AppState>) -> Result<Json<Vec<ChildDto>>, AppError> {
    Ok(Json(state.repo.list_children().await?))
}

async fn api_get_child(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChildDto>, AppError> {
    // Static mode answers every id with the sample child
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(_) if !state.repo.has_db() => SAMPLE_CHILD_ID,
        Err(e) => return Err(e),
    };
    state
        .repo
        .get_child(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Not found"))
}

// Validated in both modes; static mode echoes the child back unsaved.
async fn api_create_child(
    State(state): State<AppState>,
    body: Result<Json<api::NewChildReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ChildDto>), AppError> {
    let body = json_body(body)?;
    let Some(name) = non_empty(body.name) else {
        return Err(AppError::bad_request("name is required"));
    };
    let age = body.age.unwrap_or(DEFAULT_CHILD_AGE);
    let child = state.repo.create_child(&name, age).await?;
    Ok((StatusCode::CREATED, Json(child)))
}

async fn api_create_session(
    State(state): State<AppState>,
    body: Result<Json<api::NewSessionReq>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionDto>), AppError> {
    state.require_db()?;
    let body = json_body(body)?;
    let Some(child_id) = body.child_id else {
        return Err(AppError::bad_request("child_id required"));
    };
    let session = state
        .repo
        .create_session(child_id, body.notes.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn api_update_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<api::SessionPatchReq>, JsonRejection>,
) -> Result<Json<SessionDto>, AppError> {
    state.require_db()?;
    let id = parse_id(&id)?;
    let patch = json_body(body)?;
    state
        .repo
        .update_session(id, &patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Not found"))
}

async fn api_create_activity_block(
    State(state): State<AppState>,
    body: Result<Json<api::NewActivityBlockReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ActivityBlockDto>), AppError> {
    state.require_db()?;
    let body = json_body(body)?;
    let (Some(session_id), Some(kind)) = (body.session_id, non_empty(body.kind)) else {
        return Err(AppError::bad_request("session_id and type required"));
    };
    let payload = domain::normalize_payload(body.payload)?;
    let block = state
        .repo
        .create_activity_block(session_id, &kind, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(block)))
}

async fn api_list_social_stories(
    State(state): State<AppState>,
) -> Result<Json<Vec<SocialStoryDto>>, AppError> {
    Ok(Json(state.repo.list_social_stories().await?))
}

async fn api_create_social_story(
    State(state): State<AppState>,
    body: Result<Json<api::NewSocialStoryReq>, JsonRejection>,
) -> Result<(StatusCode, Json<SocialStoryDto>), AppError> {
    state.require_db()?;
    let body = json_body(body)?;
    let (Some(title), Some(text)) = (non_empty(body.title), non_empty(body.body)) else {
        return Err(AppError::bad_request("title and body required"));
    };
    let story = state.repo.create_social_story(&title, &text).await?;
    Ok((StatusCode::CREATED, Json(story)))
}

async fn api_list_visual_schedules(
    State(state): State<AppState>,
) -> Result<Json<Vec<VisualScheduleDto>>, AppError> {
    Ok(Json(state.repo.list_visual_schedules().await?))
}

async fn api_create_visual_schedule(
    State(state): State<AppState>,
    body: Result<Json<api::NewVisualScheduleReq>, JsonRejection>,
) -> Result<(StatusCode, Json<VisualScheduleDto>), AppError> {
    state.require_db()?;
    let body = json_body(body)?;
    let (Some(child_id), Some(raw_items)) = (body.child_id, body.items) else {
        return Err(AppError::bad_request("child_id and items required"));
    };
    let items = domain::parse_schedule_items(&raw_items)?;
    let schedule = state.repo.create_visual_schedule(child_id, &items).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

async fn api_list_rewards(State(state): State<AppState>) -> Result<Json<Vec<RewardDto>>, AppError> {
    Ok(Json(state.repo.list_rewards().await?))
}

async fn api_redeem_reward(
    State(state): State<AppState>,
    body: Result<Json<api::RedeemReq>, JsonRejection>,
) -> Result<(StatusCode, Json<RedemptionDto>), AppError> {
    state.require_db()?;
    let body = json_body(body)?;
    let (Some(child_id), Some(reward_id)) = (body.child_id, body.reward_id) else {
        return Err(AppError::bad_request("child_id and reward_id required"));
    };
    let redemption = state.repo.redeem_reward(child_id, reward_id).await?;
    Ok((StatusCode::CREATED, Json(redemption)))
}

async fn api_not_found() -> AppError {
    AppError::not_found("Not found")
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    NotImplemented,
    Internal(String),
}

impl AppError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        Self::BadRequest(msg.into())
    }
    fn not_found<T: Into<String>>(msg: T) -> Self {
        Self::NotFound(msg.into())
    }
}

impl From<DocumentError> for AppError {
    fn from(e: DocumentError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Unsupported => AppError::NotImplemented,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> AxumResponse {
        let (status, msg, kind) = match self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m, "bad_request"),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m, "not_found"),
            AppError::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                StorageError::Unsupported.to_string(),
                "not_implemented",
            ),
            AppError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m, "internal"),
        };
        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            tracing::error!(status = %status, kind = kind, message = %msg, "request failed");
        } else {
            tracing::warn!(status = %status, kind = kind, message = %msg, "request rejected");
        }
        (status, Json(ErrorBody::new(msg))).into_response()
    }
}
