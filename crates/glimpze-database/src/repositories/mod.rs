//! PostgreSQL repositories implementing the store traits.

pub mod comment;
pub mod follow;
pub mod like;
pub mod post;
pub mod profile;
pub mod quota;
pub mod role;
pub mod tag;
pub mod user;


pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use like::LikeRepository;
pub use post::PostRepository;
pub use profile::ProfileRepository;
pub use quota::QuotaRepository;
pub use role::RoleRepository;
pub use tag::TagRepository;
pub use user::UserRepository;
