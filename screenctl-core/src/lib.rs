//! screenctl-core: configuration and layout types shared by the server and CLI

pub mod config;
pub mod error;
pub mod layout;

pub use config::{AccessMode, ScreenctlConfig};
pub use error::{CoreError, Result};
pub use layout::{Component, Layout};
