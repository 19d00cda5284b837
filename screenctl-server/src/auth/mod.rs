//! Authentication primitives: password hashing and session state

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password, PasswordError};
