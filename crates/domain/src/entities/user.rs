//! 用户实体定义
//!
//! 包含用户的核心信息和在线状态操作。

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// 用户实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 用户唯一ID
    pub id: UserId,
    /// 用户名（注册时不做唯一性约束，允许重复）
    pub username: String,
    /// 邮箱（同样允许重复）
    pub email: String,
    /// 头像URL（可选）
    pub avatar_url: Option<String>,
    /// 是否在线
    pub is_online: bool,
}

impl User {
    /// 创建新用户，初始为离线状态
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            avatar_url: None,
            is_online: false,
        }
    }

    /// 标记用户上线
    pub fn mark_online(&mut self) {
        self.is_online = true;
    }

    /// 标记用户离线
    pub fn mark_offline(&mut self) {
        self.is_online = false;
    }
}
