//! 消息实体定义

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{MessageId, Timestamp, UserId};

/// 消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// 文本消息
    Text,
    /// 图片消息
    Image,
    /// 文件消息
    File,
}

impl Default for MessageType {
    fn default() -> Self {
        Self::Text
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
            Self::File => write!(f, "file"),
        }
    }
}

/// 消息实体
///
/// 消息归属的房间由消息账本维护，实体本身只记录发送方与内容。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// 消息唯一ID，全局递增且跨房间不重复
    pub id: MessageId,
    /// 发送者ID
    pub sender_id: UserId,
    /// 消息内容
    pub content: String,
    /// 消息类型
    pub message_type: MessageType,
    /// 发送时间，同一房间内单调不减
    pub sent_at: Timestamp,
    /// 是否已读
    pub is_read: bool,
}

impl Message {
    /// 创建新消息，初始为未读状态
    pub fn new(
        id: MessageId,
        sender_id: UserId,
        content: impl Into<String>,
        message_type: MessageType,
        sent_at: Timestamp,
    ) -> Self {
        Self {
            id,
            sender_id,
            content: content.into(),
            message_type,
            sent_at,
            is_read: false,
        }
    }

    /// 标记为已读。没有反向操作，已读状态不会被撤销
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}
