//! Session capability: look up, establish and clear the user bound to the
//! current client.
//!
//! The handle travels in the `bastion_session` cookie. What the cookie holds
//! depends on the backend: a signed token ([`TokenSessions`]) or an opaque key
//! into a server-side table ([`MemorySessions`]).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use bastion_types::api::SessionClaims;
use bastion_types::models::UserId;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "bastion_session";

pub trait SessionStore: Send + Sync {
    /// The user bound to this client, if the session is present and valid.
    fn current(&self, jar: &CookieJar) -> Option<UserId>;

    /// Binds `user_id` to the client, replacing any previous session.
    fn establish(&self, jar: CookieJar, user_id: UserId) -> Result<CookieJar>;

    /// Drops the client's session. Succeeds whether or not one existed.
    fn clear(&self, jar: CookieJar) -> CookieJar;
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>> {
    now.checked_add_signed(ttl)
        .ok_or_else(|| anyhow!("Session lifetime of {} overflows the clock", ttl))
}

// -- Signed token sessions --

/// Stateless sessions: the cookie carries an HS256 token naming the user.
pub struct TokenSessions {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenSessions {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

impl SessionStore for TokenSessions {
    fn current(&self, jar: &CookieJar) -> Option<UserId> {
        let token = jar.get(SESSION_COOKIE)?;
        match decode::<SessionClaims>(token.value(), &self.decoding, &Validation::default()) {
            Ok(data) => Some(data.claims.sub),
            Err(e) => {
                debug!("Rejected session token: {}", e);
                None
            }
        }
    }

    fn establish(&self, jar: CookieJar, user_id: UserId) -> Result<CookieJar> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id,
            iat: now.timestamp() as usize,
            exp: expiry(now, self.ttl)?.timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok(jar.add(session_cookie(token)))
    }

    fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(removal_cookie())
    }
}

// -- Server-side sessions --

type SessionTable = HashMap<String, (UserId, DateTime<Utc>)>;

/// Sessions kept in process memory, keyed by a random id in the cookie.
/// Clearing revokes the id, so a copied cookie stops working after logout.
/// Everything is lost on restart.
pub struct MemorySessions {
    entries: Mutex<SessionTable>,
    ttl: Duration,
}

impl MemorySessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn entries(&self) -> Result<MutexGuard<'_, SessionTable>> {
        self.entries
            .lock()
            .map_err(|e| anyhow!("Session table lock poisoned: {}", e))
    }
}

impl SessionStore for MemorySessions {
    fn current(&self, jar: &CookieJar) -> Option<UserId> {
        let key = jar.get(SESSION_COOKIE)?;
        let mut entries = self.entries().ok()?;
        let entry = entries.get(key.value()).copied();
        match entry {
            Some((user_id, expires)) if expires > Utc::now() => Some(user_id),
            Some(_) => {
                entries.remove(key.value());
                None
            }
            None => None,
        }
    }

    fn establish(&self, jar: CookieJar, user_id: UserId) -> Result<CookieJar> {
        let key = Uuid::new_v4().to_string();
        let expires = expiry(Utc::now(), self.ttl)?;
        {
            let mut entries = self.entries()?;
            entries.retain(|_, (_, exp)| *exp > Utc::now());
            if let Some(old) = jar.get(SESSION_COOKIE) {
                entries.remove(old.value());
            }
            entries.insert(key.clone(), (user_id, expires));
        }
        Ok(jar.add(session_cookie(key)))
    }

    fn clear(&self, jar: CookieJar) -> CookieJar {
        if let Some(key) = jar.get(SESSION_COOKIE) {
            if let Ok(mut entries) = self.entries() {
                entries.remove(key.value());
            }
        }
        jar.remove(removal_cookie())
    }
}
