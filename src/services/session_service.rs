//! Almacén de sesiones en memoria
//!
//! Las sesiones se identifican con un token aleatorio que viaja en la cookie
//! `charolas_sid`. Cada sesión guarda el usuario y su rol y expira a las
//! `SESSION_TTL_HOURS` horas de creada.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::user::UserRole;

#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub user_id: i32,
    pub username: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self::with_ttl(Duration::hours(ttl_hours))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Crear una sesión nueva para el usuario
    pub async fn create(&self, user_id: i32, username: &str, role: UserRole) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            username: username.to_string(),
            role,
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.token.clone(), session.clone());
        tracing::info!("🔑 Sesión creada para '{}' ({}). Sesiones activas: {}", username, role, sessions.len());

        session
    }

    /// Obtener una sesión vigente; las expiradas se descartan
    pub async fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.read().await.get(token).cloned()?;

        if session.is_expired() {
            self.sessions.write().await.remove(token);
            tracing::debug!("⌛ Sesión expirada de '{}' descartada", session.username);
            return None;
        }

        Some(session)
    }

    /// Destruir una sesión; devuelve `true` si existía
    pub async fn destroy(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Limpiar sesiones expiradas
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        before - sessions.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
