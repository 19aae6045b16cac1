use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use super::session::{cookie, cookie_token, removal, SessionKeys, FLASH_COOKIE};
use crate::error::AppError;

/// One-shot notice carried across a redirect in a signed cookie.
#[derive(Debug, Clone)]
pub struct Flash(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = cookie_token(&jar, FLASH_COOKIE) else {
            return Ok(Flash(None));
        };
        match SessionKeys::from_ref(state).verify_flash(token) {
            Ok(msg) => Ok(Flash(Some(msg))),
            Err(e) => {
                debug!(error = %e, "ignoring flash cookie");
                Ok(Flash(None))
            }
        }
    }
}

impl Flash {
    /// Render `page` and drop any flash cookie the client sent, so a notice
    /// shows once and a forged one does not linger.
    pub fn consume(&self, jar: CookieJar, page: impl IntoResponse) -> Response {
        (jar.remove(removal(FLASH_COOKIE)), page).into_response()
    }
}

/// Redirect to `to`, leaving `message` for the next rendered page.
pub fn redirect_with(
    keys: &SessionKeys,
    jar: CookieJar,
    to: &str,
    message: &str,
) -> Result<Response, AppError> {
    let token = keys.sign_flash(message)?;
    let jar = jar.add(cookie(FLASH_COOKIE, token, keys.flash_ttl));
    Ok((jar, Redirect::to(to)).into_response())
}
