//! 消息账本
//!
//! 按房间维护只追加的消息日志。每个房间的日志有自己的互斥锁，
//! ID分配、时间戳、追加、索引更新与事件分发都在锁内完成，
//! 因此同一房间的消息严格串行，不同房间完全并行。

use crate::broadcaster::{EventBus, MessageBroadcast};
use crate::clock::Clock;
use domain::{Message, MessageId, MessageType, RoomId, UserId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// 单个房间的日志句柄
type RoomLog = Arc<Mutex<Vec<Message>>>;

/// 消息账本
pub struct MessageLedger {
    /// 房间ID到日志的映射
    logs: RwLock<HashMap<RoomId, RoomLog>>,
    /// 消息ID到 (房间, 日志内下标) 的全局索引
    locate: RwLock<HashMap<MessageId, (RoomId, usize)>>,
    /// 下一个消息ID，只在持有某个房间锁时推进
    next_id: AtomicU64,
    clock: Arc<dyn Clock>,
    bus: Arc<EventBus>,
}

impl MessageLedger {
    pub fn new(clock: Arc<dyn Clock>, bus: Arc<EventBus>) -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
            locate: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            clock,
            bus,
        }
    }

    /// 获取房间日志句柄，不存在时创建空日志
    async fn room_log(&self, room_id: RoomId) -> RoomLog {
        {
            let logs = self.logs.read().await;
            if let Some(handle) = logs.get(&room_id) {
                return handle.clone();
            }
        }
        let mut logs = self.logs.write().await;
        logs.entry(room_id)
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone()
    }

    /// 为新房间准备空日志
    pub async fn ensure_room(&self, room_id: RoomId) {
        self.room_log(room_id).await;
    }

    /// 追加消息并在返回前完成订阅者分发
    ///
    /// 整个过程持有房间锁：后一条消息的分发不会早于前一条完成。
    /// 调用方负责成员资格与内容校验，追加本身不会失败。
    pub async fn append(
        &self,
        room_id: RoomId,
        sender_id: UserId,
        content: String,
        message_type: MessageType,
    ) -> Message {
        let log_handle = self.room_log(room_id).await;
        let mut log = log_handle.lock().await;

        // 在房间锁内分配ID，分配顺序即房间内追加顺序
        let id = MessageId::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        // 时钟回拨时钳制到上一条消息的时间，房间内时间单调不减
        let mut sent_at = self.clock.now();
        if let Some(last) = log.last() {
            if sent_at < last.sent_at {
                sent_at = last.sent_at;
            }
        }

        let message = Message::new(id, sender_id, content, message_type, sent_at);
        let index = log.len();
        log.push(message.clone());
        self.locate.write().await.insert(id, (room_id, index));

        let event = MessageBroadcast {
            room_id,
            message: message.clone(),
        };
        self.bus.dispatch(&event).await;

        message
    }

    /// 返回房间最近的消息，保持发送顺序
    ///
    /// `limit` 为 None 时返回全部历史，超过日志长度时整段返回。
    /// 未知房间返回空列表。
    pub async fn room_messages(&self, room_id: RoomId, limit: Option<usize>) -> Vec<Message> {
        let log_handle = {
            let logs = self.logs.read().await;
            match logs.get(&room_id) {
                Some(handle) => handle.clone(),
                None => return Vec::new(),
            }
        };
        let log = log_handle.lock().await;
        let start = match limit {
            Some(n) => log.len().saturating_sub(n),
            None => 0,
        };
        log[start..].to_vec()
    }

    /// 将指定消息标记为已读，返回是否命中
    ///
    /// 消息ID全局唯一，索引直接定位目标。未知ID是无操作。
    pub async fn mark_as_read(&self, message_id: MessageId) -> bool {
        let location = {
            let locate = self.locate.read().await;
            locate.get(&message_id).copied()
        };
        let (room_id, index) = match location {
            Some(found) => found,
            None => return false,
        };

        let log_handle = {
            let logs = self.logs.read().await;
            match logs.get(&room_id) {
                Some(handle) => handle.clone(),
                None => return false,
            }
        };
        let mut log = log_handle.lock().await;
        match log.get_mut(index) {
            Some(message) => {
                message.mark_read();
                true
            }
            None => false,
        }
    }

    /// 历史消息总数
    ///
    /// 消息只追加不删除，每条消息恰有一个索引条目，
    /// 索引大小始终等于全部房间日志长度之和。
    pub async fn total_messages(&self) -> usize {
        self.locate.read().await.len()
    }
}
