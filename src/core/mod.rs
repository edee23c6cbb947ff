//! 核心层：外部能力的抽象接口
//!
//! 处理器只依赖这里的 trait，具体实现由基础设施层注入

pub mod llm;
pub mod social;

pub use llm::TextGenerator;
pub use social::{SocialClient, DEFAULT_MAX_RESULTS};
