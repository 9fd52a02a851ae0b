use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use fitplan_core::catalog::{CatalogOptions, catalog};
use fitplan_core::chat::{ChatCompleter, ChatError, ChatReply, chat_and_record};
use fitplan_core::plan::{Plan, generate_plan};
use fitplan_core::preferences::PreferencesRequest;
use fitplan_core::progress::{
    ExerciseLog, UpdateWeightsRequest, UpdateWeightsResponse, simulate_weight_progression,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    /// A 500 with a fixed public message. The cause is logged, not returned.
    pub fn internal(public: &str, err: impl std::fmt::Display) -> Self {
        error!("{public}: {err:#}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: public.to_owned(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected request body");
        Self::bad_request(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GeneratePlanResponse {
    pub plan: Plan,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub completer: Arc<dyn ChatCompleter>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/options", get(options))
        .route("/generate-plan", post(generate_plan_handler))
        .route("/api/generate-plan", post(generate_plan_handler))
        .route("/api/chat", post(chat))
        .route("/api/update-weights", post(update_weights))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    info!("fitplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("fitplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<String> {
    let goals = catalog()
        .goals
        .iter()
        .map(|g| {
            format!(
                "<tr><td>{id}</td><td>{title}</td><td>{description}</td></tr>",
                id = g.id,
                title = g.title,
                description = g.description,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Html(format!(
        "<!DOCTYPE html>\
<html><head><title>fitplan</title></head><body>\
<h1>fitplan</h1>\
<p>12-week workout plans. <a href=\"/api/options\">/api/options</a></p>\
<p>POST /generate-plan | POST /api/chat | POST /api/update-weights</p>\
<table><tr><th>Goal</th><th>Title</th><th>Description</th></tr>{goals}</table>\
</body></html>"
    ))
}

async fn options() -> Json<CatalogOptions> {
    Json(catalog().options())
}

async fn generate_plan_handler(
    body: Result<Json<PreferencesRequest>, JsonRejection>,
) -> Result<Json<GeneratePlanResponse>, AppError> {
    let Json(request) = body?;
    let preferences = request.validate().map_err(|e| {
        warn!(error = %e, "rejected plan preferences");
        if e.is_missing() {
            AppError::bad_request("Missing required fields")
        } else {
            AppError::bad_request(e.to_string())
        }
    })?;

    let plan = generate_plan(&preferences);
    info!(
        goal = %preferences.goal,
        days = preferences.days_per_week,
        total_workouts = plan.total_workouts,
        "plan generated"
    );
    Ok(Json(GeneratePlanResponse { plan }))
}

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(request) = body?;
    let query = request.query.unwrap_or_default();

    match chat_and_record(&state.pool, state.completer.as_ref(), &query).await {
        Ok(reply) => Ok(Json(reply)),
        Err(ChatError::EmptyQuery) => Err(AppError::bad_request("query required")),
        Err(e) => Err(AppError::internal("Something went wrong", e)),
    }
}

async fn update_weights(
    body: Result<Json<UpdateWeightsRequest>, JsonRejection>,
) -> Result<Json<UpdateWeightsResponse>, AppError> {
    let Json(request) = body?;
    let updated = suggest_weights(&request.exercise_data);
    info!(
        week = request.week,
        day = request.day,
        exercises = updated.len(),
        "weights updated"
    );
    Ok(Json(UpdateWeightsResponse::new(updated)))
}

fn suggest_weights(logs: &[ExerciseLog]) -> Vec<ExerciseLog> {
    simulate_weight_progression(logs, &mut rand::rng())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use sqlx::PgPool;
    use tower::ServiceExt;

    use fitplan_core::chat::{ChatCompleter, ChatMessage};
    use fitplan_db::queries::chats;
    use fitplan_test_utils::{create_test_db, drop_test_db, unreachable_pool};

    use super::AppState;

    // -----------------------------------------------------------------------
    // Fakes
    // -----------------------------------------------------------------------

    struct FixedCompleter(&'static str);

    #[async_trait]
    impl ChatCompleter for FixedCompleter {
        fn model(&self) -> &str {
            "fixed-model"
        }

        async fn complete(&self, _query: &str) -> anyhow::Result<ChatMessage> {
            Ok(ChatMessage::assistant(self.0))
        }
    }

    struct BrokenCompleter;

    #[async_trait]
    impl ChatCompleter for BrokenCompleter {
        fn model(&self) -> &str {
            "broken-model"
        }

        async fn complete(&self, _query: &str) -> anyhow::Result<ChatMessage> {
            Err(anyhow!("connection reset by upstream"))
        }
    }

    fn state(pool: PgPool, completer: impl ChatCompleter + 'static) -> AppState {
        AppState {
            pool,
            completer: Arc::new(completer),
        }
    }

    fn offline_state() -> AppState {
        state(unreachable_pool(), FixedCompleter("unused"))
    }

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    async fn get(state: AppState, uri: &str) -> axum::response::Response {
        let app = super::build_router(state);
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_raw(state: AppState, uri: &str, body: &str) -> axum::response::Response {
        let app = super::build_router(state);
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn post_json(state: AppState, uri: &str, body: Value) -> axum::response::Response {
        post_raw(state, uri, &body.to_string()).await
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 4 * 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn strength_request() -> Value {
        json!({
            "goal": "get-stronger",
            "focus": "powerlifting",
            "equipment": "full-gym",
            "experience": "intermediate",
            "daysPerWeek": 3,
            "minutesPerWorkout": 60
        })
    }

    // -----------------------------------------------------------------------
    // Static pages
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_index_returns_html() {
        let resp = get(offline_state(), "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get("content-type")
            .expect("should have content-type header")
            .to_str()
            .unwrap();
        assert!(
            content_type.contains("text/html"),
            "content-type should contain text/html, got: {content_type}"
        );
    }

    #[tokio::test]
    async fn test_options_lists_choices() {
        let resp = get(offline_state(), "/api/options").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["goals"].as_array().unwrap().len(), 4);
        assert_eq!(json["equipment"].as_array().unwrap().len(), 4);
        assert_eq!(json["experience"].as_array().unwrap().len(), 3);
    }

    // -----------------------------------------------------------------------
    // Plan generation
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_generate_plan_success() {
        let resp = post_json(offline_state(), "/generate-plan", strength_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;

        let plan = &json["plan"];
        assert_eq!(plan["totalWorkouts"], 36);
        assert_eq!(plan["weeks"].as_array().unwrap().len(), 12);
        assert_eq!(plan["preferences"]["goal"], "get-stronger");

        let day3 = &plan["weeks"][0]["workouts"][2];
        let main_lifts = day3["exerciseGroups"]
            .as_array()
            .unwrap()
            .iter()
            .find(|g| g["name"] == "Main Lifts")
            .expect("powerlifting plan should have Main Lifts");
        assert_eq!(
            main_lifts["exercises"],
            json!([{ "name": "Squat", "sets": 4, "reps": "5" }])
        );
    }

    #[tokio::test]
    async fn test_generate_plan_api_alias() {
        let resp = post_json(offline_state(), "/api/generate-plan", strength_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_plan_missing_field() {
        let mut body = strength_request();
        body.as_object_mut().unwrap().remove("experience");

        let resp = post_json(offline_state(), "/generate-plan", body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await,
            json!({ "error": "Missing required fields" })
        );
    }

    #[tokio::test]
    async fn test_generate_plan_zero_days_is_missing() {
        let mut body = strength_request();
        body["daysPerWeek"] = json!(0);

        let resp = post_json(offline_state(), "/generate-plan", body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_plan_unknown_goal() {
        let mut body = strength_request();
        body["goal"] = json!("get-famous");

        let resp = post_json(offline_state(), "/generate-plan", body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("get-famous"));
    }

    #[tokio::test]
    async fn test_generate_plan_malformed_json() {
        let resp = post_raw(offline_state(), "/generate-plan", "{not json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json.get("error").is_some());
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_chat_missing_query() {
        let resp = post_json(offline_state(), "/api/chat", json!({})).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({ "error": "query required" }));
    }

    #[tokio::test]
    async fn test_chat_upstream_failure_is_generic() {
        let resp = post_json(
            state(unreachable_pool(), BrokenCompleter),
            "/api/chat",
            json!({ "query": "hello" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(resp).await,
            json!({ "error": "Something went wrong" })
        );
    }

    #[tokio::test]
    async fn test_chat_store_failure_is_generic() {
        let resp = post_json(
            state(unreachable_pool(), FixedCompleter("hi")),
            "/api/chat",
            json!({ "query": "hello" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(resp).await,
            json!({ "error": "Something went wrong" })
        );
    }

    #[tokio::test]
    async fn test_chat_success_is_recorded() {
        let (pool, db_name) = create_test_db().await;

        let resp = post_json(
            state(pool.clone(), FixedCompleter("Sleep eight hours.")),
            "/api/chat",
            json!({ "query": "How do I recover faster?" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(
            json["data"],
            json!({ "role": "assistant", "content": "Sleep eight hours." })
        );

        let id: uuid::Uuid = json["storageId"].as_str().unwrap().parse().unwrap();
        let stored = chats::get_chat(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.query, "How do I recover faster?");
        assert_eq!(stored.model, "fixed-model");

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    // -----------------------------------------------------------------------
    // Weight updates
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_weights() {
        let resp = post_json(
            offline_state(),
            "/api/update-weights",
            json!({
                "exerciseData": [
                    { "name": "Squat", "weight": "100" },
                    { "name": "Push-ups", "weight": "BW" }
                ],
                "week": 1,
                "day": 2
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Weights updated successfully");

        let weights = json["updatedWeights"].as_array().unwrap();
        let squat: i64 = weights[0]["weight"].as_str().unwrap().parse().unwrap();
        assert!((105..=110).contains(&squat), "got {squat}");
        assert_eq!(weights[1]["weight"], "BW");
    }

    #[tokio::test]
    async fn test_update_weights_requires_exercise_data() {
        let resp = post_json(offline_state(), "/api/update-weights", json!({ "week": 1 })).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
