use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::{
    repo_types::User,
    session::{cookie_token, SessionKeys, SESSION_COOKIE},
};
use crate::{error::AppError, state::AppState};

pub const LOGIN_PATH: &str = "/login";

/// The visitor behind this request, restored once from the session cookie.
/// `None` means anonymous.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<CurrentUser>() {
            return Ok(cached.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let user = match cookie_token(&jar, SESSION_COOKIE) {
            Some(token) => SessionKeys::from_ref(state).restore(&state.db, token).await?,
            None => None,
        };

        let current = CurrentUser(user);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// An authenticated visitor. Anonymous requests are sent to the login page.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        user.map(AuthUser)
            .ok_or_else(|| Redirect::to(LOGIN_PATH).into_response())
    }
}
