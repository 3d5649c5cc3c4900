//! Middleware de autenticación por sesión
//!
//! Este módulo extrae el token de sesión (cookie `charolas_sid` o header
//! `Authorization: Bearer`), verifica la sesión e inyecta el usuario
//! autenticado en las extensions de la request.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    models::user::UserRole,
    services::authorization_service::{self, Capability},
    state::AppState,
    utils::errors::{AppError, AppResult},
};

/// Nombre de la cookie de sesión
pub const SESSION_COOKIE: &str = "charolas_sid";

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Verificar que el rol del usuario tenga la capacidad pedida
    pub fn authorize(&self, capability: Capability) -> AppResult<()> {
        if authorization_service::is_allowed(self.role, capability) {
            return Ok(());
        }

        tracing::warn!("⛔ '{}' ({}) intentó {}", self.username, self.role, capability);
        Err(AppError::Forbidden(format!(
            "Acceso denegado. Solo los administradores pueden {}.",
            capability.action()
        )))
    }
}

/// Token de sesión desde la cookie o el header Authorization
pub fn extract_session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Resolver el usuario de la sesión actual, si existe
pub async fn current_user(state: &AppState, jar: &CookieJar, headers: &HeaderMap) -> Option<AuthenticatedUser> {
    let token = extract_session_token(jar, headers)?;
    let session = state.sessions.get(&token).await?;

    Some(AuthenticatedUser {
        user_id: session.user_id,
        username: session.username,
        role: session.role,
    })
}

/// Middleware que exige una sesión válida
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = current_user(&state, &jar, request.headers())
        .await
        .ok_or_else(|| AppError::Unauthorized("No autenticado".to_string()))?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum_extra::extract::cookie::Cookie;

    #[test]
    fn test_token_from_cookie_wins() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "cookie-token"));
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer header-token"));

        assert_eq!(extract_session_token(&jar, &headers).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn test_token_from_bearer_header() {
        let jar = CookieJar::new();
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));

        assert_eq!(extract_session_token(&jar, &headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_missing_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_session_token(&CookieJar::new(), &headers).is_none());
    }

    #[test]
    fn test_authorize() {
        let operator = AuthenticatedUser {
            user_id: 2,
            username: "operador".to_string(),
            role: UserRole::User,
        };
        assert!(operator.authorize(Capability::RecordMovement).is_ok());
        assert!(matches!(
            operator.authorize(Capability::UpdateWarehouse),
            Err(AppError::Forbidden(_))
        ));
    }
}
