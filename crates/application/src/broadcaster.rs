//! 消息事件总线
//!
//! 订阅者按注册顺序同步接收新消息事件。单个订阅者失败不会
//! 中断分发，也不会影响消息发送方的结果。

use async_trait::async_trait;
use domain::{Message, RoomId};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::error;

/// 广播给订阅者的事件载荷
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MessageBroadcast {
    pub room_id: RoomId,
    pub message: Message,
}

#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("subscriber failed: {0}")]
    Failed(String),
}

impl SubscriberError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// 消息订阅者
///
/// 回调在发送方的 `send_message` 调用内同步执行，且持有目标房间的
/// 串行化锁。实现中不要调用账本操作：同一房间会直接死锁，跨房间
/// 读取在并发分发下也可能互相等待。事件载荷已携带完整消息；
/// 目录、注册表和统计的读取不受限制。
#[async_trait]
pub trait MessageSubscriber: Send + Sync {
    async fn on_message(&self, event: &MessageBroadcast) -> Result<(), SubscriberError>;
}

/// 订阅凭证，用于取消订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct SubscriberEntry {
    id: SubscriptionId,
    active: Arc<AtomicBool>,
    subscriber: Arc<dyn MessageSubscriber>,
}

/// 事件总线
///
/// 分发时对订阅者列表做快照，逐个检查存活标记后调用。
/// 因此退订对正在进行的分发是安全的：被退订者不再收到后续事件，
/// 同一事件的其余订阅者不受影响。
pub struct EventBus {
    subscribers: RwLock<Vec<SubscriberEntry>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// 注册订阅者，返回退订凭证
    pub async fn subscribe(&self, subscriber: Arc<dyn MessageSubscriber>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subscribers = self.subscribers.write().await;
        subscribers.push(SubscriberEntry {
            id,
            active: Arc::new(AtomicBool::new(true)),
            subscriber,
        });
        id
    }

    /// 取消订阅，返回凭证是否有效。重复退订返回 false
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write().await;
        match subscribers.iter().position(|entry| entry.id == id) {
            Some(index) => {
                subscribers[index].active.store(false, Ordering::Release);
                subscribers.remove(index);
                true
            }
            None => false,
        }
    }

    /// 按注册顺序同步通知所有订阅者
    ///
    /// 返回 `Err` 的订阅者记录日志后跳过，分发继续。
    pub async fn dispatch(&self, event: &MessageBroadcast) {
        let snapshot: Vec<(Arc<AtomicBool>, Arc<dyn MessageSubscriber>)> = {
            let subscribers = self.subscribers.read().await;
            subscribers
                .iter()
                .map(|entry| (entry.active.clone(), entry.subscriber.clone()))
                .collect()
        };

        for (active, subscriber) in snapshot {
            if !active.load(Ordering::Acquire) {
                continue;
            }
            if let Err(subscriber_error) = subscriber.on_message(event).await {
                error!(
                    room_id = %event.room_id,
                    message_id = %event.message.id,
                    error = %subscriber_error,
                    "订阅者处理消息失败"
                );
            }
        }
    }

    /// 当前订阅者数量
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
