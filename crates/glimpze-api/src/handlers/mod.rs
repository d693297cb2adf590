//! Request handlers, grouped by resource.

pub mod auth;
pub mod comment;
pub mod feed;
pub mod health;
pub mod post;
pub mod social;
pub mod tag;
pub mod user;
