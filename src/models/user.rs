//! Modelo de User
//!
//! Usuarios del sistema con su rol. El rol se guarda como texto
//! (`Administrador` / `Usuario`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "Administrador")]
    Administrator,
    #[serde(rename = "Usuario")]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Administrator => "Administrador",
            UserRole::User => "Usuario",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Administrador" => Ok(UserRole::Administrator),
            "Usuario" => Ok(UserRole::User),
            other => Err(format!("Rol desconocido: {}", other)),
        }
    }
}

/// Fila de la tabla `users`
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub active: bool,
    pub last_access: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn user_role(&self) -> Result<UserRole, String> {
        self.role.parse()
    }
}
