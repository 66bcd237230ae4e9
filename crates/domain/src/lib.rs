//! 群聊引擎核心领域模型
//!
//! 包含用户、房间、消息三类实体，以及标识符值对象和领域错误。

pub mod entities;
pub mod errors;
pub mod value_objects;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
pub use value_objects::*;
