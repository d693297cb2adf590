//! Posts and their image attachments.

pub mod service;

pub use service::{PostDraft, PostEdit, PostService};
