use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        extractors::{CurrentUser, LOGIN_PATH},
        flash::{redirect_with, Flash},
        repo_types::User,
        services::{authenticate, register_user, LoginOutcome, RegisterOutcome},
        session::SessionKeys,
    },
    error::AppError,
    state::AppState,
    views,
};

pub const HOME_PATH: &str = "/";
pub const REGISTER_PATH: &str = "/register";
pub const SECRETS_PATH: &str = "/secrets";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(REGISTER_PATH, get(register_page).post(register))
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/logout", get(logout))
}

fn start_session(keys: &SessionKeys, jar: CookieJar, user: &User) -> Result<Response, AppError> {
    let jar = keys.login(jar, user)?;
    Ok((jar, Redirect::to(SECRETS_PATH)).into_response())
}

#[instrument(skip_all)]
pub async fn register_page(
    CurrentUser(current): CurrentUser,
    flash: Flash,
    jar: CookieJar,
) -> Response {
    if current.is_some() {
        return Redirect::to(SECRETS_PATH).into_response();
    }
    flash.consume(jar, views::register(flash.0.as_deref()))
}

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    State(keys): State<SessionKeys>,
    CurrentUser(current): CurrentUser,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if current.is_some() {
        return Ok(Redirect::to(SECRETS_PATH).into_response());
    }
    match register_user(&state.db, form).await? {
        RegisterOutcome::Created(user) => start_session(&keys, jar, &user),
        RegisterOutcome::Rejected(notice) => redirect_with(&keys, jar, REGISTER_PATH, notice),
    }
}

#[instrument(skip_all)]
pub async fn login_page(
    CurrentUser(current): CurrentUser,
    flash: Flash,
    jar: CookieJar,
) -> Response {
    if current.is_some() {
        return Redirect::to(SECRETS_PATH).into_response();
    }
    flash.consume(jar, views::login(flash.0.as_deref()))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    State(keys): State<SessionKeys>,
    CurrentUser(current): CurrentUser,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if current.is_some() {
        return Ok(Redirect::to(SECRETS_PATH).into_response());
    }
    match authenticate(&state.db, form).await? {
        LoginOutcome::Authenticated(user) => start_session(&keys, jar, &user),
        LoginOutcome::Rejected(notice) => redirect_with(&keys, jar, LOGIN_PATH, notice),
    }
}

#[instrument(skip_all)]
pub async fn logout(State(keys): State<SessionKeys>, jar: CookieJar) -> impl IntoResponse {
    (keys.logout(jar), Redirect::to(HOME_PATH))
}
