//! 领域模型
//!
//! 所有实体都只存在于单次请求内，不做持久化

pub mod post;
pub mod user;

pub use post::{GeneratedPost, GenerationRequest, PostRecord, MAX_POST_CHARS};
pub use user::{UserLookup, UsernameResolution, NOT_FOUND_SENTINEL};
