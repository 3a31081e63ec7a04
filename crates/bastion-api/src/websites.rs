use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::{info, warn};

use bastion_db::Database;
use bastion_types::api::WebsiteForm;
use bastion_types::models::{UserId, Website, WebsiteId};

use crate::error::ConsoleError;
use crate::middleware::CurrentUser;
use crate::notice::{self, Notice};
use crate::pages;
use crate::state::{AppState, blocking};

// -- Registry operations --

/// Stores `domain` exactly as given, with the WAF flag on.
pub fn add_website(db: &Database, owner: UserId, domain: &str) -> Result<WebsiteId, ConsoleError> {
    Ok(db.insert_website(owner, domain)?)
}

pub fn list_websites(db: &Database, owner: UserId) -> Result<Vec<Website>, ConsoleError> {
    let rows = db.list_websites(owner)?;
    Ok(rows.into_iter().map(Website::from).collect())
}

/// `None` both when the id does not exist and when it belongs to another user.
pub fn get_website(db: &Database, owner: UserId, id: WebsiteId) -> Result<Option<Website>, ConsoleError> {
    Ok(db.get_website(owner, id)?.map(Website::from))
}

// -- Handlers --

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), ConsoleError> {
    let owner = user.id;
    let websites = blocking(&state, move |db| list_websites(db, owner)).await?;

    let (jar, notice) = notice::take(jar);
    Ok((jar, pages::dashboard(&user.email, &websites, notice)))
}

pub async fn add_website_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, notice) = notice::take(jar);
    (jar, pages::add_website(notice))
}

pub async fn create_website(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Form(form): Form<WebsiteForm>,
) -> Result<(CookieJar, Redirect), ConsoleError> {
    if form.domain.is_empty() {
        return Ok((notice::push(jar, Notice::MissingFields), Redirect::to("/add-website")));
    }

    let owner = user.id;
    let id = blocking(&state, move |db| add_website(db, owner, &form.domain)).await?;
    info!("User {} added website {}", owner, id);

    Ok((notice::push(jar, Notice::WebsiteAdded), Redirect::to("/dashboard")))
}

pub async fn website_detail(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(raw_id): Path<String>,
    jar: CookieJar,
) -> Result<Response, ConsoleError> {
    let owner = user.id;
    let lookup = match raw_id.parse::<WebsiteId>() {
        Ok(id) => {
            blocking(&state, move |db| {
                get_website(db, owner, id)?.ok_or(ConsoleError::NotFoundOrUnauthorized)
            })
            .await
        }
        Err(_) => Err(ConsoleError::NotFoundOrUnauthorized),
    };

    match lookup {
        Ok(site) => {
            let (jar, notice) = notice::take(jar);
            Ok((jar, pages::website_detail(&site, notice)).into_response())
        }
        Err(ConsoleError::NotFoundOrUnauthorized) => {
            warn!("User {} asked for website '{}': not found or not theirs", owner, raw_id);
            Ok((notice::push(jar, Notice::WebsiteNotFound), Redirect::to("/dashboard")).into_response())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::register_account;

    #[test]
    fn add_then_list_roundtrips_domain() {
        let db = Database::open_in_memory().unwrap();
        let u1 = register_account(&db, "a@x.com", "p1").unwrap();

        let id = add_website(&db, u1, "example.com").unwrap();
        let listed = list_websites(&db, u1).unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].domain, "example.com");
        assert!(listed[0].waf_enabled);
        assert_eq!(get_website(&db, u1, id).unwrap().as_ref(), listed.first());
    }

    #[test]
    fn other_users_website_is_invisible() {
        let db = Database::open_in_memory().unwrap();
        let u1 = register_account(&db, "a@x.com", "p1").unwrap();
        let u2 = register_account(&db, "b@x.com", "p2").unwrap();

        let theirs = add_website(&db, u2, "b.example").unwrap();

        assert_eq!(get_website(&db, u1, theirs).unwrap(), None);
        assert_eq!(get_website(&db, u1, theirs + 1000).unwrap(), None);
    }

    #[test]
    fn domain_is_stored_verbatim() {
        let db = Database::open_in_memory().unwrap();
        let u1 = register_account(&db, "a@x.com", "p1").unwrap();

        let odd = "  ÜNÏCÖDÉ.example/<path>?q=1 ";
        let id = add_website(&db, u1, odd).unwrap();
        assert_eq!(get_website(&db, u1, id).unwrap().unwrap().domain.as_bytes(), odd.as_bytes());
    }
}
