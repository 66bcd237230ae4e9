//! 房间实体定义
//!
//! 房间维护成员列表，成员按加入顺序排列且不含重复。

use serde::{Deserialize, Serialize};

use crate::value_objects::{RoomId, Timestamp, UserId};

/// 房间实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// 房间唯一ID
    pub id: RoomId,
    /// 房间名称
    pub name: String,
    /// 成员ID列表，按加入顺序
    pub participants: Vec<UserId>,
    /// 创建时间
    pub created_at: Timestamp,
}

impl Room {
    /// 创建新房间，创建者自动成为首个成员
    pub fn new(
        id: RoomId,
        name: impl Into<String>,
        creator_id: UserId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            participants: vec![creator_id],
            created_at,
        }
    }

    /// 添加成员，返回是否实际插入。已在房间内时不产生任何变化
    pub fn add_participant(&mut self, user_id: UserId) -> bool {
        if self.is_participant(user_id) {
            return false;
        }
        self.participants.push(user_id);
        true
    }

    /// 移除成员，返回是否实际移除。不在房间内时静默忽略
    pub fn remove_participant(&mut self, user_id: UserId) -> bool {
        match self.participants.iter().position(|&p| p == user_id) {
            Some(index) => {
                self.participants.remove(index);
                true
            }
            None => false,
        }
    }

    /// 检查用户是否为房间成员
    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.participants.contains(&user_id)
    }

    /// 当前成员数量
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }
}
