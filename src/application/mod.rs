//! 应用层：业务编排

pub mod publisher;
pub mod scheduler;

pub use publisher::{PostPublisher, MAX_TOKENS, TEMPERATURE};
pub use scheduler::PostScheduler;
