//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod names;
pub mod owner;
pub mod registration;
pub mod validation;

pub use names::{ApplicationName, ScreenName};
pub use owner::Owner;
pub use registration::{Registration, ValidRegistration};
pub use validation::ValidationError;
