use std::sync::Arc;

use bastion_db::Database;
use tracing::error;

use crate::error::ConsoleError;
use crate::session::SessionStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: Box<dyn SessionStore>,
}

impl AppStateInner {
    pub fn new(db: Database, sessions: impl SessionStore + 'static) -> AppState {
        Arc::new(Self {
            db,
            sessions: Box::new(sessions),
        })
    }
}

/// Runs blocking database (and password hashing) work off the async runtime.
pub async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ConsoleError>
where
    F: FnOnce(&Database) -> Result<T, ConsoleError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ConsoleError::Internal(e.into())
        })?
}
