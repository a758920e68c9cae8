//! API routes for careerd
//!
//! Request bodies for create/update arrive as raw JSON values so the
//! handlers can distinguish an absent key from an explicit null: absent
//! leaves a column alone, null or empty clears it. Validation failures
//! name every missing field in one message.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use tracing::{error, info};

use career_common::i18n;
use career_common::sync::sync_all_users;
use career_common::view;
use career_common::{
    ApiResponse, Career, CareerStep, CareerSummary, CareerUpdate, ChallengeBrief,
    ChallengeDetail, HealthResponse, NewCareer, NewStep, ProgressOverview, StepOverview,
    StepUpdate, SyncReport,
};

use crate::auth::Identity;
use crate::error::ApiError;
use crate::server::AppStateArc;

// ============================================================================
// Career routes
// ============================================================================

pub fn career_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/v1/career", get(list_careers).post(create_career))
        .route(
            "/api/v1/career/:career_id",
            put(update_career).delete(delete_career),
        )
}

/// Every career with the caller's completion flags; recomputes first.
async fn list_careers(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<ProgressOverview>>, ApiError> {
    let overview = view::progress_overview(&state.engine, identity.user_id)?;
    Ok(Json(ApiResponse::ok(overview)))
}

async fn create_career(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<ApiResponse<Career>>), ApiError> {
    identity.require_admin()?;
    require_fields(&payload, &["name"])?;

    let new = NewCareer {
        name: require_str(&payload, "name")?,
        description: opt_string(&payload, "description"),
        icon: opt_string(&payload, "icon"),
        color: opt_string(&payload, "color"),
    };

    let career = state.store.create_career(&new)?;
    info!("Career created: {} (id {})", career.name, career.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(career))))
}

async fn update_career(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
    Path(career_id): Path<i64>,
    Json(payload): Json<Value>,
) -> Result<Json<ApiResponse<Career>>, ApiError> {
    identity.require_admin()?;

    let update = CareerUpdate {
        name: patch_name(&payload)?,
        description: patch_string(&payload, "description"),
        icon: patch_string(&payload, "icon"),
        color: patch_string(&payload, "color"),
    };

    let career = state.store.update_career(career_id, &update)?;
    Ok(Json(ApiResponse::ok(career)))
}

async fn delete_career(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
    Path(career_id): Path<i64>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    identity.require_admin()?;
    state.store.delete_career(career_id)?;
    info!("Career deleted: {}", career_id);
    Ok(Json(ApiResponse::ok(json!({ "deleted": career_id }))))
}

// ============================================================================
// Step routes
// ============================================================================

pub fn step_routes() -> Router<AppStateArc> {
    // GET takes a career id, PUT/DELETE a step id; one registration because
    // the paths share their shape
    Router::new()
        .route("/api/v1/career/steps", post(create_step))
        .route(
            "/api/v1/career/steps/:id",
            get(list_steps).put(update_step).delete(delete_step),
        )
}

/// A career's steps with the caller's completion flags.
async fn list_steps(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
    Path(career_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<StepOverview>>>, ApiError> {
    let steps = view::steps_with_completion(&state.engine, career_id, identity.user_id)?;
    Ok(Json(ApiResponse::ok(steps)))
}

async fn create_step(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<ApiResponse<CareerStep>>), ApiError> {
    identity.require_admin()?;
    require_fields(&payload, &["career_id", "name"])?;

    let new = NewStep {
        career_id: require_int(&payload, "career_id")?,
        name: require_str(&payload, "name")?,
        description: opt_string(&payload, "description"),
        category: opt_string(&payload, "category"),
        challenge_id: coerce_int(&payload, "challenge_id")?,
        image_url: opt_string(&payload, "image_url"),
        required_solves: coerce_int(&payload, "required_solves")?.unwrap_or(1),
    };

    let step = state.store.create_step(&new)?;
    info!(
        "Step created: {} (career {}, id {})",
        step.name, step.career_id, step.id
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(step))))
}

async fn update_step(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
    Path(step_id): Path<i64>,
    Json(payload): Json<Value>,
) -> Result<Json<ApiResponse<CareerStep>>, ApiError> {
    identity.require_admin()?;

    let challenge_id = match payload.get("challenge_id") {
        None => None,
        Some(_) => Some(coerce_int(&payload, "challenge_id")?),
    };

    let update = StepUpdate {
        name: patch_name(&payload)?,
        description: patch_string(&payload, "description"),
        category: patch_string(&payload, "category"),
        challenge_id,
        image_url: patch_string(&payload, "image_url"),
        required_solves: coerce_int(&payload, "required_solves")?,
    };

    let step = state.store.update_step(step_id, &update)?;
    Ok(Json(ApiResponse::ok(step)))
}

async fn delete_step(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
    Path(step_id): Path<i64>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    identity.require_admin()?;
    state.store.delete_step(step_id)?;
    info!("Step deleted: {}", step_id);
    Ok(Json(ApiResponse::ok(json!({ "deleted": step_id }))))
}

// ============================================================================
// Progress routes
// ============================================================================

pub fn progress_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/v1/career/progress", get(my_progress))
        .route("/api/v1/career/progress/:user_id", get(user_progress))
        .route("/api/v1/career/sync", put(sync_progress))
        .route("/api/v1/career/summary", get(summary))
        .route("/api/v1/career/translations", get(translations))
}

async fn my_progress(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<ProgressOverview>>, ApiError> {
    let overview = view::progress_overview(&state.engine, identity.user_id)?;
    Ok(Json(ApiResponse::ok(overview)))
}

async fn user_progress(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<ProgressOverview>>, ApiError> {
    identity.require_admin()?;
    let overview = view::user_overview_strict(&state.engine, user_id)?;
    Ok(Json(ApiResponse::ok(overview)))
}

/// Bulk recompute for every user; heavy enough to leave the async runtime.
async fn sync_progress(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<SyncReport>>, ApiError> {
    identity.require_admin()?;

    let engine = state.engine.clone();
    let report = tokio::task::spawn_blocking(move || sync_all_users(&engine))
        .await
        .map_err(|e| {
            error!("Sync task failed to complete: {}", e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        })??;
    Ok(Json(ApiResponse::ok(report)))
}

async fn summary(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<Vec<CareerSummary>>>, ApiError> {
    identity.require_admin()?;
    let summaries = view::admin_summary(&state.store)?;
    Ok(Json(ApiResponse::ok(summaries)))
}

async fn translations(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
) -> Json<ApiResponse<HashMap<String, String>>> {
    let locale = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(i18n::locale_from_accept_language)
        .unwrap_or_else(|| state.config.i18n.default_locale.clone());

    Json(ApiResponse::ok(state.translations.for_locale(&locale)))
}

// ============================================================================
// Challenge routes
// ============================================================================

pub fn challenge_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/v1/career/challenges", get(list_challenges))
        .route(
            "/api/v1/career/challenges/:challenge_id",
            get(challenge_detail),
        )
}

/// Challenge metadata for the step editor.
async fn list_challenges(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<Vec<ChallengeBrief>>>, ApiError> {
    identity.require_admin()?;
    let challenges = state.store.list_challenges()?;
    Ok(Json(ApiResponse::ok(challenges)))
}

async fn challenge_detail(
    State(state): State<AppStateArc>,
    Extension(identity): Extension<Identity>,
    Path(challenge_id): Path<i64>,
) -> Result<Json<ApiResponse<ChallengeDetail>>, ApiError> {
    let brief = state
        .store
        .challenge(challenge_id)?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Challenge not found"))?;
    let solved = state.store.has_solve(identity.user_id, challenge_id)?;

    Ok(Json(ApiResponse::ok(ChallengeDetail {
        id: brief.id,
        name: brief.name,
        category: brief.category,
        value: brief.value,
        solved,
    })))
}

// ============================================================================
// Health routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/healthz", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        name: "careerd".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        database_ok: state.store.ping().is_ok(),
    })
}

// ============================================================================
// Payload helpers
// ============================================================================

/// A field counts as present only when it is non-null, non-empty and
/// non-zero.
fn field_present(payload: &Value, field: &str) -> bool {
    match payload.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_i64() != Some(0),
        Some(Value::Bool(b)) => *b,
        Some(_) => true,
    }
}

/// Name every missing required field in a single message.
fn require_fields(payload: &Value, fields: &[&str]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| !field_present(payload, field))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(ApiError::bad_request(format!(
        "Missing required fields: {}",
        missing.join(", ")
    )))
}

fn require_str(payload: &Value, field: &str) -> Result<String, ApiError> {
    match payload.get(field).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ApiError::bad_request(format!(
            "Missing required fields: {}",
            field
        ))),
    }
}

fn require_int(payload: &Value, field: &str) -> Result<i64, ApiError> {
    coerce_int(payload, field)?.ok_or_else(|| int_error(field))
}

/// Accepts a JSON number or a numeric string; absent, null and empty-string
/// values yield `None`.
fn coerce_int(payload: &Value, field: &str) -> Result<Option<i64>, ApiError> {
    let Some(value) = payload.get(field) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_i64().map(Some).ok_or_else(|| int_error(field)),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse().map(Some).map_err(|_| int_error(field)),
        _ => Err(int_error(field)),
    }
}

fn int_error(field: &str) -> ApiError {
    ApiError::bad_request(format!("{} must be an integer", field))
}

fn opt_string(payload: &Value, field: &str) -> Option<String> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Tri-state patch: absent leaves the column alone, null or empty clears it,
/// anything else sets it.
fn patch_string(payload: &Value, field: &str) -> Option<Option<String>> {
    payload.get(field).map(|value| match value.as_str() {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    })
}

/// Rename field: absent means keep, present must be a non-empty string.
fn patch_name(payload: &Value) -> Result<Option<String>, ApiError> {
    let Some(value) = payload.get("name") else {
        return Ok(None);
    };
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(Some(s.to_string())),
        _ => Err(ApiError::bad_request("Missing required fields: name")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::{router, AppState};
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    fn test_router() -> (Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();

        let translations_dir = dir.path().join("translations");
        std::fs::create_dir_all(translations_dir.join("en")).unwrap();
        std::fs::write(
            translations_dir.join("en/translations.json"),
            r#"{"Completed": "Completed"}"#,
        )
        .unwrap();
        std::fs::create_dir_all(translations_dir.join("es")).unwrap();
        std::fs::write(
            translations_dir.join("es/translations.json"),
            r#"{"Completed": "Completado"}"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.server.database_path = dir.path().join("careerd.db");
        config.auth.shared_secret = SECRET.to_string();
        config.i18n.translations_dir = translations_dir;

        let state = Arc::new(AppState::new(config).unwrap());
        (router(state), dir)
    }

    fn request(method: &str, uri: &str, role: &str, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", SECRET))
            .header("x-user-id", "1")
            .header("x-user-role", role);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        builder.body(body).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_does_not_require_auth() {
        let (app, _dir) = test_router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["name"], "careerd");
        assert_eq!(body["database_ok"], true);
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let (app, _dir) = test_router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/career")
                    .header("x-user-id", "1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Missing bearer token");
    }

    #[tokio::test]
    async fn admin_routes_refuse_plain_users() {
        let (app, _dir) = test_router();

        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/career",
                "user",
                Some(json!({"name": "Web Career"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Admin access required");
    }

    #[tokio::test]
    async fn career_crud_round_trip() {
        let (app, _dir) = test_router();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/career",
                "admin",
                Some(json!({
                    "name": "Web Career",
                    "description": "Break web apps",
                    "color": "#336699"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["name"], "Web Career");
        let id = body["data"]["id"].as_i64().unwrap();

        // Listing as a player shows the career with no steps yet
        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/career", "user", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["careers"][0]["name"], "Web Career");
        assert_eq!(body["data"]["careers"][0]["total_steps"], 0);

        // Rename and clear the description in one patch
        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/v1/career/{}", id),
                "admin",
                Some(json!({"name": "Web Path", "description": ""})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["name"], "Web Path");
        assert_eq!(body["data"]["description"], Value::Null);
        assert_eq!(body["data"]["color"], "#336699");

        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/v1/career/{}", id),
                "admin",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["deleted"], id);
    }

    #[tokio::test]
    async fn duplicate_career_is_a_bad_request() {
        let (app, _dir) = test_router();

        let create = || {
            request(
                "POST",
                "/api/v1/career",
                "admin",
                Some(json!({"name": "Web Career"})),
            )
        };
        let response = app.clone().oneshot(create()).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.oneshot(create()).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Career already exists");
    }

    #[tokio::test]
    async fn missing_fields_are_reported_together() {
        let (app, _dir) = test_router();

        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/career/steps",
                "admin",
                Some(json!({})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Missing required fields: career_id, name");
    }

    #[tokio::test]
    async fn step_create_coerces_numeric_strings() {
        let (app, _dir) = test_router();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/career",
                "admin",
                Some(json!({"name": "Web Career"})),
            ))
            .await
            .unwrap();
        let career_id = body_json(response).await["data"]["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/career/steps",
                "admin",
                Some(json!({
                    "career_id": career_id.to_string(),
                    "name": "First Blood",
                    "category": "Web",
                    "required_solves": "3"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["data"]["required_solves"], 3);
        assert_eq!(body["data"]["career_id"], career_id);

        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/career/steps",
                "admin",
                Some(json!({
                    "career_id": career_id,
                    "name": "Second Blood",
                    "required_solves": "lots"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "required_solves must be an integer");
    }

    #[tokio::test]
    async fn step_listing_for_unknown_career_is_not_found() {
        let (app, _dir) = test_router();

        let response = app
            .oneshot(request("GET", "/api/v1/career/steps/999", "user", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Career not found");
    }

    #[tokio::test]
    async fn step_update_clears_optionals() {
        let (app, _dir) = test_router();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/career",
                "admin",
                Some(json!({"name": "Web Career"})),
            ))
            .await
            .unwrap();
        let career_id = body_json(response).await["data"]["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/career/steps",
                "admin",
                Some(json!({
                    "career_id": career_id,
                    "name": "Boss fight",
                    "challenge_id": 7,
                    "image_url": "/img/boss.png"
                })),
            ))
            .await
            .unwrap();
        let step_id = body_json(response).await["data"]["id"].as_i64().unwrap();

        let response = app
            .oneshot(request(
                "PUT",
                &format!("/api/v1/career/steps/{}", step_id),
                "admin",
                Some(json!({
                    "challenge_id": null,
                    "image_url": "",
                    "category": "Web"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"]["challenge_id"], Value::Null);
        assert_eq!(body["data"]["image_url"], Value::Null);
        assert_eq!(body["data"]["category"], "Web");
    }

    #[tokio::test]
    async fn sync_reports_an_empty_platform() {
        let (app, _dir) = test_router();

        let response = app
            .clone()
            .oneshot(request("PUT", "/api/v1/career/sync", "admin", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"]["synced"], 0);
        assert_eq!(body["data"]["failed"], json!([]));

        let response = app
            .oneshot(request("GET", "/api/v1/career/summary", "admin", None))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn admin_progress_for_unknown_user_is_not_found() {
        let (app, _dir) = test_router();

        let response = app
            .oneshot(request("GET", "/api/v1/career/progress/999", "admin", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn translations_follow_accept_language() {
        let (app, _dir) = test_router();

        let mut req = request("GET", "/api/v1/career/translations", "user", None);
        req.headers_mut()
            .insert("accept-language", "es-ES,es;q=0.9".parse().unwrap());

        let response = app.clone().oneshot(req).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["Completed"], "Completado");

        // No header falls back to the configured locale
        let response = app
            .oneshot(request("GET", "/api/v1/career/translations", "user", None))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["Completed"], "Completed");
    }

    #[tokio::test]
    async fn unknown_challenge_is_not_found() {
        let (app, _dir) = test_router();

        let response = app
            .oneshot(request("GET", "/api/v1/career/challenges/41", "user", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Challenge not found");
    }

    #[test]
    fn presence_treats_empty_and_zero_as_missing() {
        let payload = json!({"name": "", "career_id": 0, "ok": "x", "n": 3});
        assert!(!field_present(&payload, "name"));
        assert!(!field_present(&payload, "career_id"));
        assert!(!field_present(&payload, "missing"));
        assert!(field_present(&payload, "ok"));
        assert!(field_present(&payload, "n"));
    }

    #[test]
    fn coerce_int_accepts_numbers_and_numeric_strings() {
        let payload = json!({"a": 3, "b": "4", "c": "", "d": null, "e": "x", "f": true});
        assert_eq!(coerce_int(&payload, "a").unwrap(), Some(3));
        assert_eq!(coerce_int(&payload, "b").unwrap(), Some(4));
        assert_eq!(coerce_int(&payload, "c").unwrap(), None);
        assert_eq!(coerce_int(&payload, "d").unwrap(), None);
        assert_eq!(coerce_int(&payload, "missing").unwrap(), None);
        assert!(coerce_int(&payload, "e").is_err());
        assert!(coerce_int(&payload, "f").is_err());
    }

    #[test]
    fn patch_string_distinguishes_absent_from_clearing() {
        let payload = json!({"icon": "", "color": "#fff", "description": null});
        assert_eq!(patch_string(&payload, "missing"), None);
        assert_eq!(patch_string(&payload, "icon"), Some(None));
        assert_eq!(patch_string(&payload, "description"), Some(None));
        assert_eq!(
            patch_string(&payload, "color"),
            Some(Some("#fff".to_string()))
        );
    }
}
