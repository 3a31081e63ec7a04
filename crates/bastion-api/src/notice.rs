//! One-shot status messages carried across a redirect.
//!
//! A handler pushes a [`Notice`] before redirecting; the next page rendered for
//! that client takes it out of the cookie and shows it once.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const NOTICE_COOKIE: &str = "bastion_notice";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EmailTaken,
    Registered,
    InvalidCredentials,
    MissingFields,
    WebsiteAdded,
    WebsiteNotFound,
    LoggedOut,
}

impl Notice {
    const ALL: [Notice; 7] = [
        Notice::EmailTaken,
        Notice::Registered,
        Notice::InvalidCredentials,
        Notice::MissingFields,
        Notice::WebsiteAdded,
        Notice::WebsiteNotFound,
        Notice::LoggedOut,
    ];

    /// Cookie-safe identifier.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmailTaken => "email-taken",
            Self::Registered => "registered",
            Self::InvalidCredentials => "invalid-credentials",
            Self::MissingFields => "missing-fields",
            Self::WebsiteAdded => "website-added",
            Self::WebsiteNotFound => "website-not-found",
            Self::LoggedOut => "logged-out",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::EmailTaken => "Email already registered",
            Self::Registered => "Registration successful. Please login.",
            Self::InvalidCredentials => "Invalid credentials",
            Self::MissingFields => "Please fill in all fields",
            Self::WebsiteAdded => "Website added successfully",
            Self::WebsiteNotFound => "Website not found or unauthorized",
            Self::LoggedOut => "You have been logged out",
        }
    }

    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::EmailTaken | Self::InvalidCredentials | Self::MissingFields | Self::WebsiteNotFound
        )
    }
}

/// Queues `notice` for the next rendered page, replacing any pending one.
pub fn push(jar: CookieJar, notice: Notice) -> CookieJar {
    jar.add(
        Cookie::build((NOTICE_COOKIE, notice.code()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Removes the pending notice, if any. Unknown codes are dropped silently.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Notice>) {
    let Some(cookie) = jar.get(NOTICE_COOKIE) else {
        return (jar, None);
    };
    let notice = Notice::from_code(cookie.value());
    (jar.remove(Cookie::build(NOTICE_COOKIE).path("/")), notice)
}
