//! Route handlers organized by resource

pub mod applications;
pub mod auth;
pub mod health;
pub mod pages;
pub mod screens;
pub mod upload;
