//! Likes and follows.

pub mod service;

pub use service::SocialService;
