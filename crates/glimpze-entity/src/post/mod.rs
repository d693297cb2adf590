//! Post domain entities.

pub mod file;
pub mod model;

pub use file::{NewPostFile, PostFile};
pub use model::{FeedItem, NewPost, Post};
