//! 统一配置中心
//!
//! 提供群聊引擎的全局配置管理，包括：
//! - 用户名与邮箱长度上限
//! - 房间名长度上限
//! - 消息内容长度上限

use serde::{Deserialize, Serialize};
use std::env;

/// 引擎全局配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 输入长度限制
    pub limits: LimitsConfig,
}

/// 输入长度限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub max_username_length: usize,
    pub max_email_length: usize,
    pub max_room_name_length: usize,
    pub max_message_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_username_length: 50,
            max_email_length: 100,
            max_room_name_length: 100,
            max_message_length: 4000,
        }
    }
}

impl EngineConfig {
    /// 从环境变量加载配置
    /// 未设置或解析失败的变量回退到默认值，加载过程不会失败
    pub fn from_env() -> Self {
        let defaults = LimitsConfig::default();
        Self {
            limits: LimitsConfig {
                max_username_length: env::var("CHAT_MAX_USERNAME_LENGTH")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.max_username_length),
                max_email_length: env::var("CHAT_MAX_EMAIL_LENGTH")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.max_email_length),
                max_room_name_length: env::var("CHAT_MAX_ROOM_NAME_LENGTH")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.max_room_name_length),
                max_message_length: env::var("CHAT_MAX_MESSAGE_LENGTH")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.max_message_length),
            },
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 所有上限必须为正数
        if self.limits.max_username_length == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_username_length must be greater than 0".to_string(),
            ));
        }
        if self.limits.max_email_length == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_email_length must be greater than 0".to_string(),
            ));
        }
        if self.limits.max_room_name_length == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_room_name_length must be greater than 0".to_string(),
            ));
        }
        if self.limits.max_message_length == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_message_length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    /// 默认配置不读取环境变量，适合测试场景
    fn default() -> Self {
        Self {
            limits: LimitsConfig::default(),
        }
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
}
