//! API endpoint handlers

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tether_core::{Goal, GoalNote, GoalProgress, MemoryHit, DEFAULT_SEARCH_LIMIT};
use tracing::debug;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::error::ApiError;
use crate::state::AppState;

/// Default for the accepted-but-unused `max_tokens` export parameter
const DEFAULT_MAX_TOKENS: i64 = 1500;

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

fn ok() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetStateBody {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct GetStateParams {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct StateValue {
    pub value: Option<String>,
}

/// POST /state/set
pub async fn state_set(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SetStateBody>,
) -> Result<Json<OkResponse>, ApiError> {
    debug!(key = %body.key, "Setting state");
    state
        .with_storage(move |s| s.set_state(&body.key, &body.value))
        .await?;
    Ok(ok())
}

/// GET /state/get
pub async fn state_get(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<GetStateParams>,
) -> Result<Json<StateValue>, ApiError> {
    let value = state.with_storage(move |s| s.get_state(&params.key)).await?;
    Ok(Json(StateValue { value }))
}

// ============================================================================
// MEMORY
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MemoryBody {
    pub event: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<i64>,
}

/// POST /memory/add
pub async fn memory_add(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<MemoryBody>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = state
        .with_storage(move |s| s.add_memory(&body.event, body.tags.as_deref().unwrap_or(&[])))
        .await?;
    debug!(id, "Memory event appended");
    Ok(ok())
}

/// GET /memory/search
pub async fn memory_search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<MemoryHit>>, ApiError> {
    let limit = state
        .config
        .profile
        .search_limit(params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT));
    let hits = state
        .with_storage(move |s| s.search_memory(&params.q, limit))
        .await?;
    debug!(hits = hits.len(), limit, "Memory search");
    Ok(Json(hits))
}

// ============================================================================
// GOALS
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GoalBody {
    pub goal: String,
}

#[derive(Debug, Serialize)]
pub struct GoalCreated {
    pub id: i64,
    pub goal: String,
    pub status: String,
}

impl From<Goal> for GoalCreated {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.id,
            goal: goal.goal,
            status: goal.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProgressBody {
    pub goal_id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GoalDetail {
    #[serde(flatten)]
    pub goal: Goal,
    pub notes: Vec<GoalNote>,
}

/// POST /goals/add
pub async fn goals_add(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<GoalBody>,
) -> Result<Json<GoalCreated>, ApiError> {
    let goal = state.with_storage(move |s| s.add_goal(&body.goal)).await?;
    debug!(id = goal.id, "Goal created");
    Ok(Json(goal.into()))
}

/// POST /goals/progress
pub async fn goals_progress(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProgressBody>,
) -> Result<Json<OkResponse>, ApiError> {
    let goal_id = body.goal_id;
    let progress = GoalProgress {
        status: body.status,
        note: body.note,
    };
    state
        .with_storage(move |s| s.update_goal_progress(goal_id, &progress))
        .await?;
    debug!(goal_id, "Goal progress recorded");
    Ok(ok())
}

/// GET /goals/{id}
pub async fn goal_get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<GoalDetail>, ApiError> {
    let detail = state
        .with_storage(move |s| {
            let Some(goal) = s.get_goal(id)? else {
                return Ok(None);
            };
            let notes = s.goal_notes(id)?;
            Ok(Some(GoalDetail { goal, notes }))
        })
        .await?
        .ok_or(ApiError::NotFound("Goal not found"))?;
    Ok(Json(detail))
}

// ============================================================================
// CONTEXT
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// Accepted for client compatibility; the output is bounded by the
    /// profile's character cap instead.
    pub max_tokens: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PromptBlock {
    pub prompt_block: String,
}

/// GET /context/export
pub async fn context_export(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ExportParams>,
) -> Result<Json<PromptBlock>, ApiError> {
    let limits = state.config.profile.export_limits();
    let prompt_block = state.with_storage(move |s| s.export_context(&limits)).await?;
    debug!(
        chars = prompt_block.chars().count(),
        max_tokens = params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        "Context exported"
    );
    Ok(Json(PromptBlock { prompt_block }))
}

// ============================================================================
// HEALTH
// ============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let counts = state.with_storage(|s| s.stats()).await?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "profile": state.config.profile,
        "counts": counts,
    })))
}
