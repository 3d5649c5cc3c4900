use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::UserRole;

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50, message = "Usuario requerido"))]
    pub username: String,
    #[validate(length(min = 1, message = "Contraseña requerida"))]
    pub password: String,
}

// Usuario de la sesión, sin datos sensibles
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub username: String,
    pub rol: UserRole,
}

// Login response; el token también viaja en la cookie de sesión
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: SessionUser,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// Estado de la sesión actual
#[derive(Debug, Serialize)]
pub struct CheckSessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}
