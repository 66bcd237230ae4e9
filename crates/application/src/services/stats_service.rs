//! 统计服务

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::directory::UserDirectory;
use crate::ledger::MessageLedger;
use crate::registry::RoomRegistry;

/// 引擎运行统计快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStatistics {
    /// 注册用户总数
    pub total_users: usize,
    /// 当前在线用户数
    pub online_users: usize,
    /// 房间总数
    pub total_rooms: usize,
    /// 历史消息总数
    pub total_messages: usize,
}

/// 统计服务，所有数值在调用时即时计算，不做缓存
pub struct StatsService {
    directory: Arc<UserDirectory>,
    registry: Arc<RoomRegistry>,
    ledger: Arc<MessageLedger>,
}

impl StatsService {
    pub fn new(
        directory: Arc<UserDirectory>,
        registry: Arc<RoomRegistry>,
        ledger: Arc<MessageLedger>,
    ) -> Self {
        Self {
            directory,
            registry,
            ledger,
        }
    }

    /// 生成当前统计快照
    pub async fn get_statistics(&self) -> ChatStatistics {
        let statistics = ChatStatistics {
            total_users: self.directory.user_count().await,
            online_users: self.directory.online_count().await,
            total_rooms: self.registry.room_count().await,
            total_messages: self.ledger.total_messages().await,
        };
        debug!("统计快照: {:?}", statistics);
        statistics
    }
}
