use std::time::Duration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use super::claims::{FlashClaims, SessionClaims, TokenKind};
use crate::{auth::repo_types::User, config::SessionConfig, state::AppState};

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

/// Signing material for the session and flash cookies.
#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub session_ttl: Duration,
    pub flash_ttl: Duration,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.session)
    }
}

impl SessionKeys {
    pub fn new(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            session_ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64) * 60),
            flash_ttl: Duration::from_secs((cfg.flash_ttl_minutes.max(0) as u64) * 60),
        }
    }

    fn window(ttl: Duration) -> (usize, usize) {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        (now.unix_timestamp() as usize, exp.unix_timestamp() as usize)
    }

    fn sign<T: Serialize>(&self, claims: &T) -> anyhow::Result<String> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    fn verify<T: DeserializeOwned>(&self, token: &str) -> anyhow::Result<T> {
        let mut validation = Validation::default();
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        Ok(decode::<T>(token, &self.decoding, &validation)?.claims)
    }

    pub fn sign_session(&self, user_id: i64) -> anyhow::Result<String> {
        let (iat, exp) = Self::window(self.session_ttl);
        let token = self.sign(&SessionClaims {
            sub: user_id,
            iat,
            exp,
            iss: self.issuer.clone(),
            kind: TokenKind::Session,
        })?;
        debug!(user_id, "session signed");
        Ok(token)
    }

    pub fn verify_session(&self, token: &str) -> anyhow::Result<SessionClaims> {
        let claims: SessionClaims = self.verify(token)?;
        if claims.kind != TokenKind::Session {
            anyhow::bail!("not a session token");
        }
        Ok(claims)
    }

    pub fn sign_flash(&self, message: &str) -> anyhow::Result<String> {
        let (iat, exp) = Self::window(self.flash_ttl);
        self.sign(&FlashClaims {
            msg: message.to_owned(),
            iat,
            exp,
            iss: self.issuer.clone(),
            kind: TokenKind::Flash,
        })
    }

    pub fn verify_flash(&self, token: &str) -> anyhow::Result<String> {
        let claims: FlashClaims = self.verify(token)?;
        if claims.kind != TokenKind::Flash {
            anyhow::bail!("not a flash token");
        }
        Ok(claims.msg)
    }

    /// Mark the client as authenticated as `user`.
    pub fn login(&self, jar: CookieJar, user: &User) -> anyhow::Result<CookieJar> {
        let token = self.sign_session(user.id)?;
        Ok(jar.add(cookie(SESSION_COOKIE, token, self.session_ttl)))
    }

    /// Drop the session cookie the client sent.
    pub fn logout(&self, jar: CookieJar) -> CookieJar {
        jar.remove(removal(SESSION_COOKIE))
    }

    /// Rehydrate the user named by a session token. Bad or expired tokens, and
    /// tokens naming a user that no longer exists, restore to anonymous.
    pub async fn restore(&self, db: &SqlitePool, token: &str) -> sqlx::Result<Option<User>> {
        let claims = match self.verify_session(token) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "discarding session token");
                return Ok(None);
            }
        };
        let user = User::find_by_id(db, claims.sub).await?;
        if user.is_none() {
            warn!(user_id = claims.sub, "session names unknown user");
        }
        Ok(user)
    }
}

pub fn cookie(name: &'static str, value: String, ttl: Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(TimeDuration::seconds(ttl.as_secs() as i64))
        .build()
}

/// Matches the path of [`cookie`] so browsers drop the right one.
pub fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

/// Non-empty value of `name`, with RFC 6265 quoting stripped.
pub fn cookie_token<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name)
        .map(|c| c.value_trimmed())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_config, test_pool};
    use axum::{
        http::{header, HeaderMap, HeaderValue},
        response::IntoResponse,
    };

    fn make_keys(secret: &str) -> SessionKeys {
        let mut cfg = test_config("unused").session;
        cfg.secret = secret.into();
        SessionKeys::new(&cfg)
    }

    #[test]
    fn sign_and_verify_session_token() {
        let keys = make_keys("dev-secret");
        let token = keys.sign_session(7).expect("sign session");
        let claims = keys.verify_session(&token).expect("verify session");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.iss, "secretsite-test");
        assert_eq!(claims.kind, TokenKind::Session);
    }

    #[test]
    fn session_rejects_other_secret() {
        let token = make_keys("one").sign_session(1).unwrap();
        assert!(make_keys("two").verify_session(&token).is_err());
    }

    #[test]
    fn session_rejects_flash_token() {
        let keys = make_keys("dev-secret");
        let flash = keys.sign_flash("hello").unwrap();
        assert!(keys.verify_session(&flash).is_err());
        assert_eq!(keys.verify_flash(&flash).unwrap(), "hello");
    }

    #[test]
    fn session_rejects_expired_token() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let stale = keys
            .sign(&SessionClaims {
                sub: 1,
                iat: now - 7200,
                exp: now - 3600,
                iss: keys.issuer.clone(),
                kind: TokenKind::Session,
            })
            .unwrap();
        assert!(keys.verify_session(&stale).is_err());
    }

    fn ann() -> User {
        User {
            id: 3,
            email: "a@x.com".into(),
            password: "hash".into(),
            name: "Ann".into(),
        }
    }

    fn jar_with(raw: &'static str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(raw));
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn login_cookie_carries_a_valid_token() {
        let keys = make_keys("dev-secret");
        let jar = keys.login(CookieJar::new(), &ann()).unwrap();
        let cookie = jar.get(SESSION_COOKIE).expect("session cookie");

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(TimeDuration::hours(24)));
        assert_eq!(keys.verify_session(cookie.value()).unwrap().sub, 3);
    }

    #[test]
    fn logout_emits_an_expired_session_cookie() {
        let keys = make_keys("dev-secret");
        let response = keys.logout(jar_with("session=abc")).into_response();

        let set = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let removed = Cookie::parse(set.to_owned()).unwrap();
        assert_eq!(removed.name(), SESSION_COOKIE);
        assert_eq!(removed.value(), "");
        assert_eq!(removed.max_age(), Some(TimeDuration::ZERO));
        assert_eq!(removed.path(), Some("/"));
    }

    #[test]
    fn token_reader_strips_quotes_and_skips_empty_values() {
        let quoted = jar_with(r#"theme=dark; session="abc.def.ghi""#);
        assert_eq!(cookie_token(&quoted, SESSION_COOKIE), Some("abc.def.ghi"));
        assert_eq!(cookie_token(&quoted, "theme"), Some("dark"));
        assert_eq!(cookie_token(&quoted, FLASH_COOKIE), None);

        let empty = jar_with("session=");
        assert_eq!(cookie_token(&empty, SESSION_COOKIE), None);
    }

    #[tokio::test]
    async fn restore_loads_user_or_falls_back_to_anonymous() {
        let db = test_pool().await;
        let keys = make_keys("dev-secret");
        let user = User::insert(&db, "a@x.com", "hash", "Ann").await.unwrap();

        let token = keys.sign_session(user.id).unwrap();
        assert_eq!(keys.restore(&db, &token).await.unwrap(), Some(user));

        assert_eq!(keys.restore(&db, "garbage").await.unwrap(), None);

        let ghost = keys.sign_session(9_999).unwrap();
        assert_eq!(keys.restore(&db, &ghost).await.unwrap(), None);
    }
}
