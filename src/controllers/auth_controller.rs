use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::config::environment::BootstrapAdmin;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, SessionUser};
use crate::models::user::UserRole;
use crate::repositories::user_repository::UserRepository;
use crate::services::session_service::{Session, SessionStore};
use crate::utils::errors::{AppError, AppResult};

pub struct AuthController {
    repository: UserRepository,
    sessions: SessionStore,
}

impl AuthController {
    pub fn new(pool: PgPool, sessions: SessionStore) -> Self {
        Self {
            repository: UserRepository::new(pool),
            sessions,
        }
    }

    /// Validar credenciales y abrir una sesión
    pub async fn login(&self, request: LoginRequest) -> AppResult<(Session, LoginResponse)> {
        request.validate()?;

        let username = request.username.trim();
        let user = match self.repository.find_active_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!("🔒 Intento de login con usuario desconocido '{}'", username);
                return Err(invalid_credentials());
            }
        };

        // Verificar contraseña
        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verificando contraseña: {}", e)))?;

        if !valid {
            warn!("🔒 Contraseña incorrecta para '{}'", username);
            return Err(invalid_credentials());
        }

        let role = user.user_role().map_err(AppError::Internal)?;
        self.repository.touch_last_access(user.id).await?;

        let session = self.sessions.create(user.id, &user.username, role).await;
        info!("✅ Login exitoso de '{}' ({})", user.username, role);

        let response = LoginResponse {
            user: SessionUser {
                username: session.username.clone(),
                rol: session.role,
            },
            token: session.token.clone(),
            expires_at: session.expires_at,
        };

        Ok((session, response))
    }

    pub async fn logout(&self, token: &str) -> bool {
        self.sessions.destroy(token).await
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Usuario o contraseña incorrectos".to_string())
}

/// Crear el administrador inicial si la tabla de usuarios está vacía.
/// Devuelve `true` si se creó.
pub async fn ensure_bootstrap_admin(pool: PgPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    let repository = UserRepository::new(pool);
    if repository.count().await? > 0 {
        return Ok(false);
    }

    let password_hash = hash(&admin.password, DEFAULT_COST)
        .map_err(|e| AppError::Hash(format!("Error generando hash: {}", e)))?;
    repository
        .create(&admin.username, &password_hash, UserRole::Administrator)
        .await?;

    info!("👤 Administrador inicial '{}' creado", admin.username);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        assert!(matches!(invalid_credentials(), AppError::Unauthorized(_)));
    }

    #[test]
    fn test_bcrypt_round_trip() {
        let hashed = hash("charolas123", 4).unwrap();
        assert!(verify("charolas123", &hashed).unwrap());
        assert!(!verify("otra", &hashed).unwrap());
    }
}
