//! Comments on posts.

pub mod service;

pub use service::CommentService;
