use std::convert::Infallible;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{error, info, instrument};

use crate::{
    auth::extractors::{AuthUser, CurrentUser},
    error::AppError,
    state::AppState,
    views,
};

pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/secrets", get(secrets))
        .route("/download", get(download))
}

#[instrument(skip_all)]
pub async fn home(CurrentUser(user): CurrentUser) -> Html<String> {
    views::home(user.as_ref())
}

#[instrument(skip_all)]
pub async fn secrets(AuthUser(user): AuthUser) -> Html<String> {
    views::secrets(&user)
}

/// Streams the fixed download. A missing file is a deployment fault, not a 404.
#[instrument(skip_all)]
pub async fn download(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    request: Request,
) -> Result<Response, AppError> {
    let path = &state.config.download_path;
    let response = ServeFile::new(path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never: Infallible| match never {});

    if response.status() == StatusCode::NOT_FOUND {
        error!(%path, "download file missing");
        return Err(anyhow::anyhow!("download file missing: {path}").into());
    }

    info!(user_id = user.id, status = %response.status(), "download served");
    Ok(response.into_response())
}
