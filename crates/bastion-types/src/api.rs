use serde::{Deserialize, Serialize};

use crate::models::UserId;

// -- Session --

/// Claims carried by a token-backed session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: UserId,
    pub iat: usize,
    pub exp: usize,
}

// -- Auth --

/// Body of `POST /register` and `POST /login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// -- Websites --

/// Body of `POST /add-website`.
#[derive(Debug, Deserialize)]
pub struct WebsiteForm {
    #[serde(default)]
    pub domain: String,
}
