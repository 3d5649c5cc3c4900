//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::ledger::LedgerError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Duplicate code: {0}")]
    DuplicateCode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Negative balance: {0}")]
    NegativeBalance(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            message,
            details: None,
            code: code.to_string(),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl AppError {
    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Hash(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_)
            | AppError::InvalidState(_)
            | AppError::InsufficientStock(_)
            | AppError::NegativeBalance(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateCode(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Código estable legible por el cliente
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::DuplicateCode(_) => "DUPLICATE_CODE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            AppError::NegativeBalance(_) => "NEGATIVE_BALANCE",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Hash(_) => "HASH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let body = match self {
            AppError::Database(e) => {
                tracing::error!("❌ Error de base de datos: {}", e);
                ErrorResponse::new(
                    "Database Error",
                    "Ocurrió un error al acceder a la base de datos".to_string(),
                    code,
                )
            }

            AppError::Validation(e) => {
                tracing::warn!("⚠️ Error de validación: {}", e);
                ErrorResponse::new("Validation Error", "Los datos enviados no son válidos".to_string(), code)
                    .with_details(json!(e))
            }

            AppError::DuplicateCode(msg) => {
                tracing::warn!("⚠️ Código duplicado: {}", msg);
                ErrorResponse::new("Duplicate Code", msg, code)
            }

            AppError::NotFound(msg) => {
                tracing::warn!("🔍 Recurso no encontrado: {}", msg);
                ErrorResponse::new("Not Found", msg, code)
            }

            AppError::InvalidState(msg) => {
                tracing::warn!("⚠️ Estado inválido: {}", msg);
                ErrorResponse::new("Invalid State", msg, code)
            }

            AppError::InsufficientStock(msg) => {
                tracing::warn!("📦 Existencias insuficientes: {}", msg);
                ErrorResponse::new("Insufficient Stock", msg, code)
            }

            AppError::NegativeBalance(msg) => {
                tracing::warn!("📉 Saldo negativo: {}", msg);
                ErrorResponse::new("Negative Balance", msg, code)
            }

            AppError::Conflict(msg) => {
                tracing::warn!("🔁 Conflicto: {}", msg);
                ErrorResponse::new("Conflict", msg, code)
            }

            AppError::Unauthorized(msg) => {
                tracing::warn!("🔒 Acceso no autenticado: {}", msg);
                ErrorResponse::new("Unauthorized", msg, code)
            }

            AppError::Forbidden(msg) => {
                tracing::warn!("⛔ Acceso denegado: {}", msg);
                ErrorResponse::new("Forbidden", msg, code)
            }

            AppError::BadRequest(msg) => {
                tracing::warn!("⚠️ Solicitud incorrecta: {}", msg);
                ErrorResponse::new("Bad Request", msg, code)
            }

            AppError::Hash(msg) => {
                tracing::error!("❌ Error de hash: {}", msg);
                ErrorResponse::new(
                    "Hash Error",
                    "Ocurrió un error al procesar las credenciales".to_string(),
                    code,
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("❌ Error interno: {}", msg);
                ErrorResponse::new(
                    "Internal Server Error",
                    "Ocurrió un error inesperado".to_string(),
                    code,
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientStock { .. } => AppError::InsufficientStock(err.to_string()),
            LedgerError::NegativeBalance { .. } => AppError::NegativeBalance(err.to_string()),
            LedgerError::NegativeQuantity { .. } | LedgerError::Overflow => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Cuerpo JSON inválido: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("Parámetro de ruta inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Parámetros de consulta inválidos: {}", rejection.body_text()))
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Convierte una violación de clave única en `DuplicateCode`
pub fn map_unique_violation(err: sqlx::Error, message: impl Into<String>) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::DuplicateCode(message.into())
        }
        _ => AppError::Database(err),
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} '{}' no encontrado", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trays::TraySize;
    use crate::services::ledger::StockHolder;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::DuplicateCode("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidState("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InsufficientStock("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NegativeBalance("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_ledger_error_mapping() {
        let err: AppError = LedgerError::InsufficientStock {
            holder: StockHolder::Warehouse,
            size: TraySize::Large,
            available: 100,
            requested: 120,
        }
        .into();
        assert!(matches!(err, AppError::InsufficientStock(_)));
        assert_eq!(err.code(), "INSUFFICIENT_STOCK");

        let err: AppError = LedgerError::NegativeBalance {
            size: TraySize::Small,
            resulting: -1,
        }
        .into();
        assert!(matches!(err, AppError::NegativeBalance(_)));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::InvalidState("La ruta ya está finalizada".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INVALID_STATE");
        assert_eq!(body["message"], "La ruta ya está finalizada");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let response = AppError::Database(sqlx::Error::PoolTimedOut).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body.get("details").is_none());
        assert_eq!(body["code"], "DB_ERROR");
    }
}
