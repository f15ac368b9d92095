use std::sync::Arc;

use anyhow::{Context, Result};
use argon2::PasswordVerifier;
use argon2::{password_hash::SaltString, Argon2, PasswordHash};
use axum::extract::FromRequestParts;
use axum::http::{header::COOKIE, request::Parts, HeaderMap};
use axum::response::{IntoResponse, Redirect, Response};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::RequestError;

pub const SESSION_COOKIE: &str = "sessionId";
const SESSION_TOKEN_BYTES: usize = 100;

/// Single-admin session state. At most one session token is valid at a
/// time; only its argon2 hash is kept.
pub struct SessionGate {
    username: String,
    password_hash: String,
    session_hash: RwLock<Option<String>>,
}

impl SessionGate {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            session_hash: RwLock::new(None),
        }
    }

    /// Returns a fresh session token when the credentials match, replacing
    /// any previous session.
    pub async fn login(&self, name: &str, password: String) -> Result<Option<String>> {
        let password_ok = verify_password_argon2(password, &self.password_hash).await?;
        if !password_ok || name != self.username {
            warn!(name, "rejected login");
            return Ok(None);
        }

        let token = generate_session_token();
        let token_hash = hash_password_argon2(token.clone()).await?;
        *self.session_hash.write().await = Some(token_hash);
        info!(name, "admin logged in");
        Ok(Some(token))
    }

    pub async fn is_authenticated(&self, token: Option<&str>) -> bool {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return false,
        };
        let session_hash = match self.session_hash.read().await.clone() {
            Some(hash) => hash,
            None => return false,
        };
        match verify_password_argon2(token.to_owned(), &session_hash).await {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Error verifying session token: {:?}", e);
                false
            }
        }
    }

    pub async fn logout(&self) {
        if self.session_hash.write().await.take().is_some() {
            info!("admin session invalidated");
        }
    }
}

fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// Whether the request carries the current admin session cookie.
pub struct Session {
    pub authenticated: bool,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync + 'static,
{
    type Rejection = RequestError;
    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let gate = parts
            .extensions
            .get::<Arc<SessionGate>>()
            .cloned()
            .context("Session gate is not installed")?;
        let token = session_token_from_headers(&parts.headers);
        Ok(Session {
            authenticated: gate.is_authenticated(token.as_deref()).await,
        })
    }
}

/// Guard for write routes; anonymous requests are sent to the login page.
pub struct AdminSession;

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync + 'static,
{
    type Rejection = Response;
    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        if !session.authenticated {
            return Err(Redirect::to("/login").into_response());
        }
        Ok(AdminSession)
    }
}

pub async fn verify_password_argon2(password: String, hash: &str) -> Result<bool> {
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || {
        let hash = PasswordHash::new(hash.as_str())
            .map_err(|_| anyhow::anyhow!("Failed to parse password hash"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok())
    })
    .await
    .context("Failed to verify password")?
}

pub async fn hash_password_argon2(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(OsRng);
        let hash = PasswordHash::generate(Argon2::default(), password.as_bytes(), salt.as_salt())
            .map_err(|_| anyhow::anyhow!("Failed to hash password"))?;
        Ok(hash.to_string())
    })
    .await
    .context("Failed to hash password")?
}
