//! HTTP transport
//!
//! `POST /api/extractbanner` runs an extraction through the shared
//! [`BannerService`], `GET /api/health` is a liveness probe and `/images`
//! serves persisted banners.

use std::path::Path;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::extraction::{BannerData, BannerService, DeviceProfile, ExtractionResult, IMAGES_ROUTE};

pub const HEALTH_PATH: &str = "/api/health";
pub const EXTRACT_PATH: &str = "/api/extractbanner";

#[derive(Clone)]
struct AppState {
    service: Arc<BannerService>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractBannerBody {
    #[serde(default)]
    artist_url: Option<String>,
    #[serde(default, alias = "deviceType")]
    device_profile: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ExtractBannerResponse {
    Success { success: bool, data: BannerData },
    Failure { success: bool, error: String },
}

impl ExtractBannerResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            success: false,
            error: error.into(),
        }
    }
}

impl IntoResponse for ExtractBannerResponse {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Success { .. } => StatusCode::OK,
            Self::Failure { .. } => StatusCode::BAD_REQUEST,
        };
        (status, Json(self)).into_response()
    }
}

impl From<ExtractionResult> for ExtractBannerResponse {
    fn from(result: ExtractionResult) -> Self {
        match result {
            ExtractionResult::Success(data) => Self::Success {
                success: true,
                data,
            },
            ExtractionResult::Failure { reason } => Self::failure(reason.to_string()),
        }
    }
}

/// Build the application router.
pub fn build_router(service: Arc<BannerService>, images_dir: &Path) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(EXTRACT_PATH, post(extract_banner))
        .nest_service(IMAGES_ROUTE, ServeDir::new(images_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

/// Serve `router` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> anyhow::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "Server is running" }))
}

async fn extract_banner(
    State(state): State<AppState>,
    body: Result<Json<ExtractBannerBody>, JsonRejection>,
) -> ExtractBannerResponse {
    let body = match body {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => ExtractBannerBody::default(),
        Err(rejection) => {
            tracing::warn!("Rejected extraction body: {}", rejection.body_text());
            return ExtractBannerResponse::failure(rejection.body_text());
        }
    };

    let Some(artist_url) = body
        .artist_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    else {
        return ExtractBannerResponse::failure("No artist URL provided");
    };

    let profile = match body.device_profile.as_deref() {
        None => DeviceProfile::default(),
        Some(raw) => match raw.parse::<DeviceProfile>() {
            Ok(profile) => profile,
            Err(message) => return ExtractBannerResponse::failure(message),
        },
    };

    tracing::info!("Extraction requested for {artist_url} ({profile})");
    state.service.extract(artist_url, profile).await.into()
}
