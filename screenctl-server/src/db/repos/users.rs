//! User repository
//!
//! `username` and `email` columns are `COLLATE NOCASE`, so plain equality is
//! already case-insensitive.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};

use super::{is_unique_violation, DbError};

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new account; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub contact_number: Option<&'a str>,
    pub password_hash: &'a str,
}

/// User repository
pub struct UserRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> UserRepo<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Insert an account. A duplicate username or email becomes `Conflict`
    /// naming the column that collided.
    pub async fn insert(&mut self, user: NewUser<'_>, now: DateTime<Utc>) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, contact_number, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.contact_number)
        .bind(user.password_hash)
        .bind(now)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            if !is_unique_violation(&e) {
                return DbError::Sqlx(e);
            }
            let on_email = e
                .as_database_error()
                .is_some_and(|db| db.message().contains("users.email"));
            if on_email {
                DbError::Conflict {
                    resource: "email",
                    name: user.email.unwrap_or_default().to_owned(),
                }
            } else {
                DbError::Conflict {
                    resource: "username",
                    name: user.username.to_owned(),
                }
            }
        })
    }

    pub async fn find(&mut self, id: i64) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(&mut self, username: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(user)
    }

    pub async fn username_taken(&mut self, username: &str) -> Result<bool, DbError> {
        let (taken,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
                .bind(username)
                .fetch_one(&mut *self.conn)
                .await?;
        Ok(taken)
    }

    pub async fn email_taken(&mut self, email: &str) -> Result<bool, DbError> {
        let (taken,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(email)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;

    fn alice() -> NewUser<'static> {
        NewUser {
            username: "alice",
            email: Some("alice@x.com"),
            contact_number: Some("1234567890"),
            password_hash: "hash",
        }
    }

    #[tokio::test]
    async fn lookup_ignores_case() {
        let pool = connect_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = UserRepo::new(&mut conn);

        let created = repo.insert(alice(), Utc::now()).await.unwrap();
        let found = repo.find_by_username("ALICE").await.unwrap().unwrap();

        assert_eq!(found.id, created.id);
        assert!(repo.username_taken("Alice").await.unwrap());
        assert!(repo.email_taken("ALICE@X.COM").await.unwrap());
        assert!(!repo.email_taken("bob@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let pool = connect_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = UserRepo::new(&mut conn);

        repo.insert(alice(), Utc::now()).await.unwrap();
        let dup = NewUser {
            username: "Alice",
            email: None,
            ..alice()
        };

        let err = repo.insert(dup, Utc::now()).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { resource: "username", .. }));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let pool = connect_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = UserRepo::new(&mut conn);

        repo.insert(alice(), Utc::now()).await.unwrap();
        let dup = NewUser {
            username: "bob",
            ..alice()
        };

        let err = repo.insert(dup, Utc::now()).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { resource: "email", .. }));
    }

    #[tokio::test]
    async fn accounts_without_email_do_not_collide() {
        let pool = connect_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = UserRepo::new(&mut conn);

        for name in ["carol", "dave"] {
            let user = NewUser {
                username: name,
                email: None,
                contact_number: None,
                password_hash: "hash",
            };
            repo.insert(user, Utc::now()).await.unwrap();
        }
    }
}
