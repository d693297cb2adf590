//! # glimpze-service
//!
//! Business logic service layer for Glimpze. Each service orchestrates the
//! stores, blob storage, and auth guards to implement one group of use
//! cases.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time. Operations that act on behalf of a user take the
//! authenticated [`User`](glimpze_entity::user::User) as their first
//! argument and run the role and ownership guards themselves.

pub mod account;
pub mod comment;
pub mod feed;
pub mod mail;
pub mod post;
pub mod social;
pub mod tag;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use account::{AccountService, Registration};
pub use comment::CommentService;
pub use feed::FeedService;
pub use mail::{MailMessage, Mailer, MailtrapMailer, OutboxMailer};
pub use post::{PostDraft, PostEdit, PostService};
pub use social::SocialService;
pub use tag::TagService;
pub use user::{UserDetails, UserService};
