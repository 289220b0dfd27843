//! Owner identity: a random id carried in a signed cookie.
//!
//! The id is only a partition key for history rows; it authenticates nothing.
//! A cookie whose signature fails to verify is ignored and a new id is issued.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use history_db::{Database, DbError};
use uuid::Uuid;

use crate::app::SharedState;

pub const OWNER_COOKIE: &str = "userId";
const COOKIE_KEY_SETTING: &str = "COOKIE_SIGNING_KEY";

/// Owner id bound to the current request by [`assign_owner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Middleware: reuse the caller's owner id, or mint one and set the cookie.
pub async fn assign_owner(State(state): State<SharedState>, mut req: Request, next: Next) -> Response {
    let jar = SignedCookieJar::from_headers(req.headers(), state.cookie_key().clone());
    let existing = jar
        .get(OWNER_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());

    if let Some(owner) = existing {
        req.extensions_mut().insert(OwnerId(owner));
        return next.run(req).await;
    }

    let owner = Uuid::new_v4().to_string();
    tracing::debug!(owner = %owner, "Issued new owner id");
    req.extensions_mut().insert(OwnerId(owner.clone()));
    let response = next.run(req).await;

    let cookie = Cookie::build((OWNER_COOKIE, owner))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/");
    (jar.add(cookie), response).into_response()
}

/// Load the cookie signing key from settings, creating and storing one on first start.
pub fn load_or_create_key(db: &Database) -> Result<Key, DbError> {
    if let Some(stored) = db.get_setting(COOKIE_KEY_SETTING)? {
        let decoded = hex::decode(stored.trim())
            .ok()
            .and_then(|bytes| Key::try_from(bytes.as_slice()).ok());
        match decoded {
            Some(key) => return Ok(key),
            None => tracing::warn!("Stored cookie signing key is invalid, generating a new one"),
        }
    }

    let key = Key::generate();
    db.set_setting(COOKIE_KEY_SETTING, &hex::encode(key.master()))?;
    tracing::info!("Generated new cookie signing key");
    Ok(key)
}
