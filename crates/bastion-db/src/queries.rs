use crate::models::{UserRow, WebsiteRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};

/// Outcome of inserting a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateUser {
    Created(i64),
    /// The UNIQUE constraint on `users.email` rejected the insert.
    EmailTaken,
}

impl Database {
    // -- Users --

    pub fn create_user(&self, email: &str, password_hash: &str) -> Result<CreateUser> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (email, password) VALUES (?1, ?2)",
                (email, password_hash),
            );

            match inserted {
                Ok(_) => Ok(CreateUser::Created(conn.last_insert_rowid())),
                Err(e) if is_unique_violation(&e) => Ok(CreateUser::EmailTaken),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email = ?1", email))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", id))
    }

    pub fn count_users(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    // -- Websites --

    /// New websites always start with `waf_enabled = 1`.
    pub fn insert_website(&self, user_id: i64, domain: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO websites (user_id, domain) VALUES (?1, ?2)",
                rusqlite::params![user_id, domain],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_websites(&self, user_id: i64) -> Result<Vec<WebsiteRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, domain, waf_enabled, created_at
                 FROM websites
                 WHERE user_id = ?1
                 ORDER BY id",
            )?;

            let rows = stmt
                .query_map([user_id], website_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Owner-scoped lookup: a website belonging to someone else reads the
    /// same as one that does not exist.
    pub fn get_website(&self, user_id: i64, website_id: i64) -> Result<Option<WebsiteRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, user_id, domain, waf_enabled, created_at
                     FROM websites
                     WHERE id = ?1 AND user_id = ?2",
                    [website_id, user_id],
                    website_from_row,
                )
                .optional()?;

            Ok(row)
        })
    }
}

fn query_user<P: rusqlite::ToSql>(conn: &Connection, filter: &str, value: P) -> Result<Option<UserRow>> {
    let sql = format!("SELECT id, email, password, created_at FROM users WHERE {filter}");
    let row = conn
        .query_row(&sql, [value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn website_from_row(row: &Row<'_>) -> rusqlite::Result<WebsiteRow> {
    Ok(WebsiteRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        domain: row.get(2)?,
        waf_enabled: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_user(email: &str) -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let CreateUser::Created(id) = db.create_user(email, "$argon2id$stub").unwrap() else {
            panic!("fresh email should insert");
        };
        (db, id)
    }

    #[test]
    fn duplicate_email_is_reported_not_raised() {
        let (db, _) = db_with_user("a@x.com");

        let second = db.create_user("a@x.com", "$argon2id$other").unwrap();
        assert_eq!(second, CreateUser::EmailTaken);
        assert_eq!(db.count_users().unwrap(), 1);
    }

    #[test]
    fn user_lookup_by_email_and_id() {
        let (db, id) = db_with_user("a@x.com");

        let by_email = db.get_user_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(by_email.id, id);
        assert_eq!(by_email.password, "$argon2id$stub");

        let by_id = db.get_user_by_id(id).unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");

        assert!(db.get_user_by_email("missing@x.com").unwrap().is_none());
        assert!(db.get_user_by_id(id + 100).unwrap().is_none());
    }

    #[test]
    fn websites_list_in_insertion_order_with_waf_on() {
        let (db, id) = db_with_user("a@x.com");

        db.insert_website(id, "b.example").unwrap();
        db.insert_website(id, "a.example").unwrap();
        db.insert_website(id, "a.example").unwrap();

        let sites = db.list_websites(id).unwrap();
        let domains: Vec<_> = sites.iter().map(|s| s.domain.as_str()).collect();
        assert_eq!(domains, ["b.example", "a.example", "a.example"]);
        assert!(sites.iter().all(|s| s.waf_enabled));
    }

    #[test]
    fn get_website_is_owner_scoped() {
        let (db, alice) = db_with_user("alice@x.com");
        let CreateUser::Created(bob) = db.create_user("bob@x.com", "h").unwrap() else {
            panic!("fresh email should insert");
        };

        let site = db.insert_website(bob, "bob.example").unwrap();

        assert!(db.get_website(alice, site).unwrap().is_none());
        assert_eq!(db.get_website(bob, site).unwrap().unwrap().domain, "bob.example");
        assert!(db.list_websites(alice).unwrap().is_empty());
    }

    #[test]
    fn website_requires_existing_owner() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.insert_website(42, "orphan.example").is_err());
    }
}
