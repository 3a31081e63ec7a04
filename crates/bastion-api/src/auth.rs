use std::sync::LazyLock;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::{info, warn};

use bastion_db::{CreateUser, Database};
use bastion_types::api::CredentialsForm;
use bastion_types::models::UserId;

use crate::error::ConsoleError;
use crate::notice::{self, Notice};
use crate::pages;
use crate::state::{AppState, blocking};

// -- Account operations --

/// Argon2id with a fresh random salt; returns the PHC string.
pub fn hash_password(plaintext: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| anyhow!("Password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

/// Creates an account. An email already on file yields `DuplicateEmail`,
/// whether it is caught by the lookup or by the UNIQUE constraint racing
/// another registration.
pub fn register_account(db: &Database, email: &str, password: &str) -> Result<UserId, ConsoleError> {
    if db.get_user_by_email(email)?.is_some() {
        return Err(ConsoleError::DuplicateEmail);
    }

    let password_hash = hash_password(password)?;

    match db.create_user(email, &password_hash)? {
        CreateUser::Created(id) => Ok(id),
        CreateUser::EmailTaken => Err(ConsoleError::DuplicateEmail),
    }
}

/// Hash checked against when the email is unknown, so both login failures
/// cost one Argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("bastion-no-such-account").ok());

fn burn_verification(password: &str) {
    if let Some(Ok(parsed)) = DUMMY_HASH.as_deref().map(PasswordHash::new) {
        let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
    }
}

/// Unknown email and wrong password are the same failure to the caller.
pub fn verify_credentials(db: &Database, email: &str, password: &str) -> Result<UserId, ConsoleError> {
    let Some(user) = db.get_user_by_email(email)? else {
        burn_verification(password);
        return Err(ConsoleError::InvalidCredentials);
    };

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow!("Stored hash for user {} is unreadable: {}", user.id, e))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ConsoleError::InvalidCredentials)?;

    Ok(user.id)
}

// -- Handlers --

pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Redirect {
    if state.sessions.current(&jar).is_some() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

pub async fn register_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, notice) = notice::take(jar);
    (jar, pages::register(notice))
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<(CookieJar, Redirect), ConsoleError> {
    if form.email.is_empty() || form.password.is_empty() {
        return Ok((notice::push(jar, Notice::MissingFields), Redirect::to("/register")));
    }

    let email = form.email.clone();
    let outcome = blocking(&state, move |db| {
        register_account(db, &form.email, &form.password)
    })
    .await;

    match outcome {
        Ok(user_id) => {
            info!("Registered user {} ({})", user_id, email);
            Ok((notice::push(jar, Notice::Registered), Redirect::to("/login")))
        }
        Err(ConsoleError::DuplicateEmail) => {
            info!("Registration rejected, email already on file: {}", email);
            Ok((notice::push(jar, Notice::EmailTaken), Redirect::to("/register")))
        }
        Err(e) => Err(e),
    }
}

pub async fn login_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, notice) = notice::take(jar);
    (jar, pages::login(notice))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, ConsoleError> {
    let (jar, _) = notice::take(jar);

    if form.email.is_empty() || form.password.is_empty() {
        return Ok((jar, pages::login(Some(Notice::MissingFields))).into_response());
    }

    let email = form.email.clone();
    let outcome = blocking(&state, move |db| {
        verify_credentials(db, &form.email, &form.password)
    })
    .await;

    match outcome {
        Ok(user_id) => {
            let jar = state.sessions.establish(jar, user_id)?;
            info!("User {} logged in", user_id);
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        Err(ConsoleError::InvalidCredentials) => {
            warn!("Failed login for {}", email);
            Ok((jar, pages::login(Some(Notice::InvalidCredentials))).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(user_id) = state.sessions.current(&jar) {
        info!("User {} logged out", user_id);
    }
    let jar = state.sessions.clear(jar);
    (notice::push(jar, Notice::LoggedOut), Redirect::to("/login"))
}
