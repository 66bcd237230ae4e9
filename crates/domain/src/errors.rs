//! 领域错误定义
//!
//! 定义引擎中所有可能的失败类型。每个失败都作为显式结果返回，
//! 并且保证失败时不留下任何部分状态。

use thiserror::Error;

use crate::value_objects::{RoomId, UserId};

/// 领域错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 用户不存在
    #[error("用户不存在: {user_id}")]
    UserNotFound { user_id: UserId },

    /// 房间不存在
    #[error("房间不存在: {room_id}")]
    RoomNotFound { room_id: RoomId },

    /// 用户不是房间成员
    #[error("用户 {user_id} 不是房间 {room_id} 的成员")]
    NotParticipant { room_id: RoomId, user_id: UserId },

    /// 参数验证失败
    #[error("参数无效: {field}: {message}")]
    InvalidArgument { field: String, message: String },
}

impl DomainError {
    /// 创建用户不存在错误
    pub fn user_not_found(user_id: UserId) -> Self {
        Self::UserNotFound { user_id }
    }

    /// 创建房间不存在错误
    pub fn room_not_found(room_id: RoomId) -> Self {
        Self::RoomNotFound { room_id }
    }

    /// 创建成员校验错误
    pub fn not_participant(room_id: RoomId, user_id: UserId) -> Self {
        Self::NotParticipant { room_id, user_id }
    }

    /// 创建参数验证错误
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 领域操作结果类型
pub type DomainResult<T> = Result<T, DomainError>;
