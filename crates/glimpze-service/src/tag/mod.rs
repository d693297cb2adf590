//! The moderated tag vocabulary and post tagging.

pub mod service;

pub use service::TagService;
