use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use bastion_types::models::{User, UserId};
use tracing::warn;

use crate::error::ConsoleError;
use crate::state::{AppState, blocking};

/// The logged-in user, inserted as a request extension by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Gate for every protected route. Without a live session the request is
/// redirected to the login page before the handler runs.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(&state, &jar).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(ConsoleError::Unauthenticated) => {
            let jar = state.sessions.clear(jar);
            (jar, Redirect::to("/login")).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn authenticate(state: &AppState, jar: &CookieJar) -> Result<CurrentUser, ConsoleError> {
    let user_id = state.sessions.current(jar).ok_or(ConsoleError::Unauthenticated)?;

    // A session can outlive its account row (e.g. the database was reset).
    let user: User = blocking(state, move |db| Ok(db.get_user_by_id(user_id)?.map(User::from)))
        .await?
        .ok_or_else(|| {
            warn!("Session refers to unknown user {}", user_id);
            ConsoleError::Unauthenticated
        })?;

    Ok(CurrentUser::from(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::register_account;
    use crate::session::TokenSessions;
    use crate::state::AppStateInner;
    use bastion_db::Database;

    fn state() -> AppState {
        let sessions = TokenSessions::new(b"0123456789abcdef0123456789abcdef", chrono::Duration::hours(1));
        AppStateInner::new(Database::open_in_memory().unwrap(), sessions)
    }

    #[tokio::test]
    async fn authenticate_loads_account() {
        let state = state();
        let id = register_account(&state.db, "a@x.com", "p1").unwrap();
        let jar = state.sessions.establish(CookieJar::new(), id).unwrap();

        let user = authenticate(&state, &jar).await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "a@x.com");
    }

    #[tokio::test]
    async fn session_for_vanished_user_is_unauthenticated() {
        let state = state();
        let jar = state.sessions.establish(CookieJar::new(), 404).unwrap();

        assert!(matches!(
            authenticate(&state, &jar).await,
            Err(ConsoleError::Unauthenticated)
        ));
    }
}
