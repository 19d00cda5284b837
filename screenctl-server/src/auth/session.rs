//! Session keys and helpers
//!
//! The session carries the signed-in user id and a one-shot flash message
//! for the form pages. Nothing else reads or writes session state.

use tower_sessions::Session;

/// Session key holding the signed-in user's id
pub const SESSION_USER_ID_KEY: &str = "user_id";
/// Session key holding the signed-in user's display name
pub const SESSION_USERNAME_KEY: &str = "username";
/// Session key holding a message for the next rendered page
pub const FLASH_KEY: &str = "flash";

pub type SessionResult<T> = Result<T, tower_sessions::session::Error>;

/// Record a successful login. The session id is rotated first.
pub async fn sign_in(session: &Session, user_id: i64, username: &str) -> SessionResult<()> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, user_id).await?;
    session.insert(SESSION_USERNAME_KEY, username).await?;
    Ok(())
}

/// Drop all session data and the session record.
pub async fn sign_out(session: &Session) -> SessionResult<()> {
    session.flush().await
}

pub async fn user_id(session: &Session) -> SessionResult<Option<i64>> {
    session.get::<i64>(SESSION_USER_ID_KEY).await
}

pub async fn username(session: &Session) -> SessionResult<Option<String>> {
    session.get::<String>(SESSION_USERNAME_KEY).await
}

pub async fn set_flash(session: &Session, message: impl Into<String>) -> SessionResult<()> {
    session.insert(FLASH_KEY, message.into()).await
}

/// Read and clear the pending flash message.
pub async fn take_flash(session: &Session) -> SessionResult<Option<String>> {
    session.remove::<String>(FLASH_KEY).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn flash_is_read_once() {
        let session = session();
        set_flash(&session, "Invalid username or password").await.unwrap();

        assert_eq!(
            take_flash(&session).await.unwrap().as_deref(),
            Some("Invalid username or password")
        );
        assert_eq!(take_flash(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn sign_in_then_out() {
        let session = session();
        sign_in(&session, 7, "alice").await.unwrap();
        assert_eq!(user_id(&session).await.unwrap(), Some(7));
        assert_eq!(username(&session).await.unwrap().as_deref(), Some("alice"));

        sign_out(&session).await.unwrap();
        assert_eq!(user_id(&session).await.unwrap(), None);
    }
}
