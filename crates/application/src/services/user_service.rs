//! 用户服务
//!
//! 覆盖用户注册与在线状态两类用例。

use std::sync::Arc;

use config::LimitsConfig;
use domain::{DomainError, DomainResult, User, UserId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::directory::UserDirectory;

/// 注册用户请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    /// 用户名
    pub username: String,
    /// 邮箱
    pub email: String,
}

/// 用户服务依赖
pub struct UserServiceDependencies {
    pub directory: Arc<UserDirectory>,
    pub limits: LimitsConfig,
}

/// 用户服务
pub struct UserService {
    directory: Arc<UserDirectory>,
    limits: LimitsConfig,
}

impl UserService {
    pub fn new(deps: UserServiceDependencies) -> Self {
        Self {
            directory: deps.directory,
            limits: deps.limits,
        }
    }

    /// 注册新用户，初始为离线状态
    ///
    /// 用户名和邮箱允许重复，只校验非空与长度上限。
    pub async fn register_user(&self, request: RegisterUserRequest) -> DomainResult<User> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(DomainError::invalid_argument("username", "用户名不能为空"));
        }
        if username.chars().count() > self.limits.max_username_length {
            return Err(DomainError::invalid_argument("username", "用户名过长"));
        }

        let email = request.email.trim();
        if email.is_empty() {
            return Err(DomainError::invalid_argument("email", "邮箱不能为空"));
        }
        if email.chars().count() > self.limits.max_email_length {
            return Err(DomainError::invalid_argument("email", "邮箱过长"));
        }

        let user = self
            .directory
            .insert(username.to_string(), email.to_string())
            .await;
        info!("注册用户: {} ({})", user.username, user.id);
        Ok(user)
    }

    /// 用户上线，返回用户是否存在
    pub async fn login(&self, user_id: UserId) -> bool {
        match self.directory.set_online(user_id, true).await {
            Some(user) => {
                info!("用户 {} 上线", user.id);
                true
            }
            None => {
                debug!("登录失败，用户 {} 不存在", user_id);
                false
            }
        }
    }

    /// 用户下线。用户不存在时静默忽略
    pub async fn logout(&self, user_id: UserId) {
        if self.directory.set_online(user_id, false).await.is_some() {
            info!("用户 {} 下线", user_id);
        }
    }

    /// 按注册顺序返回当前在线的用户
    pub async fn online_users(&self) -> Vec<User> {
        self.directory.online_users().await
    }

    /// 查询用户信息
    pub async fn get_user(&self, user_id: UserId) -> Option<User> {
        self.directory.get(user_id).await
    }
}
