//! 领域实体定义
//!
//! 包含引擎的核心实体：用户、房间、消息。

pub mod message;
pub mod room;
pub mod user;

// 重新导出核心实体
pub use message::{Message, MessageType};
pub use room::Room;
pub use user::User;
