use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{
    dto::{LoginForm, RegisterForm},
    password::{hash_password, verify_password},
    repo_types::User,
};
use crate::error::AppError;

pub const MISSING_FIELDS: &str = "Please fill in every field.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const EMAIL_TAKEN: &str = "Email already exists in the database. Please use another email.";
pub const INVALID_CREDENTIALS: &str = "Invalid Username and/or password. Please try again.";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug)]
pub enum RegisterOutcome {
    Created(User),
    Rejected(&'static str),
}

#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(User),
    Rejected(&'static str),
}

/// Create an account unless the email is already on file.
///
/// The lookup and the insert are separate statements with no transaction, so
/// two concurrent registrations for one address can both succeed.
pub async fn register_user(db: &SqlitePool, form: RegisterForm) -> Result<RegisterOutcome, AppError> {
    let email = form.email.trim();
    let name = form.name.trim();

    if email.is_empty() || form.password.is_empty() || name.is_empty() {
        return Ok(RegisterOutcome::Rejected(MISSING_FIELDS));
    }
    if !is_valid_email(email) {
        warn!(email, "invalid email");
        return Ok(RegisterOutcome::Rejected(INVALID_EMAIL));
    }
    if User::find_by_email(db, email).await?.is_some() {
        warn!(email, "email already registered");
        return Ok(RegisterOutcome::Rejected(EMAIL_TAKEN));
    }

    let hash = hash_password(&form.password)?;
    let user = User::insert(db, email, &hash, name).await?;
    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(RegisterOutcome::Created(user))
}

/// Check credentials. Blank fields, an unknown email and a wrong password all
/// produce the same rejection.
pub async fn authenticate(db: &SqlitePool, form: LoginForm) -> Result<LoginOutcome, AppError> {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        warn!(email, "login with blank field");
        return Ok(LoginOutcome::Rejected(INVALID_CREDENTIALS));
    }

    let Some(user) = User::find_by_email(db, email).await? else {
        warn!(email, "login unknown email");
        return Ok(LoginOutcome::Rejected(INVALID_CREDENTIALS));
    };

    if !verify_password(&form.password, &user.password)? {
        warn!(email, user_id = user.id, "login invalid password");
        return Ok(LoginOutcome::Rejected(INVALID_CREDENTIALS));
    }

    info!(user_id = user.id, "user logged in");
    Ok(LoginOutcome::Authenticated(user))
}
