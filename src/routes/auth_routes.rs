use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{CheckSessionResponse, LoginRequest, LoginResponse, SessionUser};
use crate::dto::ApiResponse;
use crate::middleware::auth::{current_user, extract_session_token, AuthenticatedUser, SESSION_COOKIE};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/verify", get(verify))
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), AppError> {
    let controller = AuthController::new(state.pool.clone(), state.sessions.clone());
    let (session, response) = controller.login(request).await?;

    let cookie = Cookie::build((SESSION_COOKIE, session.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.is_production());

    Ok((
        jar.add(cookie),
        Json(ApiResponse::success_with_message(response, "Inicio de sesión exitoso")),
    ))
}

async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (CookieJar, Json<ApiResponse<()>>) {
    if let Some(token) = extract_session_token(&jar, &headers) {
        let controller = AuthController::new(state.pool.clone(), state.sessions.clone());
        if controller.logout(&token).await {
            tracing::info!("👋 Sesión cerrada");
        }
    }

    let removal = Cookie::build(SESSION_COOKIE).path("/");
    (jar.remove(removal), Json(ApiResponse::message("Sesión cerrada")))
}

async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<SessionUser>>, AppError> {
    let user = current_user(&state, &jar, &headers)
        .await
        .ok_or_else(|| AppError::Unauthorized("No autenticado".to_string()))?;

    Ok(Json(ApiResponse::success(session_user(user))))
}

/// GET /check-session
pub async fn check_session(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Json<CheckSessionResponse> {
    let user = current_user(&state, &jar, &headers).await;

    Json(CheckSessionResponse {
        authenticated: user.is_some(),
        user: user.map(session_user),
    })
}

fn session_user(user: AuthenticatedUser) -> SessionUser {
    SessionUser {
        username: user.username,
        rol: user.role,
    }
}
