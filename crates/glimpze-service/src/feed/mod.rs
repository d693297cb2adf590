//! Personalised and public feeds.

pub mod service;

pub use service::FeedService;
