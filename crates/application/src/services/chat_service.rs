//! 聊天服务
//!
//! 覆盖房间生命周期、消息收发与事件订阅三类用例。

use std::sync::Arc;

use config::LimitsConfig;
use domain::{DomainError, DomainResult, Message, MessageId, MessageType, Room, RoomId, UserId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::broadcaster::{EventBus, MessageSubscriber, SubscriptionId};
use crate::clock::Clock;
use crate::directory::UserDirectory;
use crate::ledger::MessageLedger;
use crate::registry::RoomRegistry;

/// 创建房间请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    /// 房间名称
    pub name: String,
    /// 创建者ID
    pub creator_id: UserId,
}

/// 发送消息请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// 目标房间ID
    pub room_id: RoomId,
    /// 发送者ID
    pub sender_id: UserId,
    /// 消息内容
    pub content: String,
    /// 消息类型，缺省为文本
    #[serde(default)]
    pub message_type: MessageType,
}

impl SendMessageRequest {
    /// 构造一条文本消息请求
    pub fn text(room_id: RoomId, sender_id: UserId, content: impl Into<String>) -> Self {
        Self {
            room_id,
            sender_id,
            content: content.into(),
            message_type: MessageType::Text,
        }
    }
}

/// 聊天服务依赖
pub struct ChatServiceDependencies {
    pub directory: Arc<UserDirectory>,
    pub registry: Arc<RoomRegistry>,
    pub ledger: Arc<MessageLedger>,
    pub bus: Arc<EventBus>,
    pub clock: Arc<dyn Clock>,
    pub limits: LimitsConfig,
}

/// 聊天服务
pub struct ChatService {
    directory: Arc<UserDirectory>,
    registry: Arc<RoomRegistry>,
    ledger: Arc<MessageLedger>,
    bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    limits: LimitsConfig,
}

impl ChatService {
    pub fn new(deps: ChatServiceDependencies) -> Self {
        Self {
            directory: deps.directory,
            registry: deps.registry,
            ledger: deps.ledger,
            bus: deps.bus,
            clock: deps.clock,
            limits: deps.limits,
        }
    }

    /// 创建房间，创建者自动成为首个成员
    pub async fn create_room(&self, request: CreateRoomRequest) -> DomainResult<Room> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_argument("name", "房间名不能为空"));
        }
        if name.chars().count() > self.limits.max_room_name_length {
            return Err(DomainError::invalid_argument("name", "房间名过长"));
        }
        if !self.directory.contains(request.creator_id).await {
            return Err(DomainError::user_not_found(request.creator_id));
        }

        let room = self
            .registry
            .insert(name.to_string(), request.creator_id, self.clock.now())
            .await;
        self.ledger.ensure_room(room.id).await;

        info!("创建房间: {} by {}", room.name, request.creator_id);
        Ok(room)
    }

    /// 加入房间，返回是否为新成员
    ///
    /// 已是成员时幂等成功并返回 false，不产生状态变化。
    pub async fn join_room(&self, room_id: RoomId, user_id: UserId) -> DomainResult<bool> {
        if !self.registry.contains(room_id).await {
            return Err(DomainError::room_not_found(room_id));
        }
        if !self.directory.contains(user_id).await {
            return Err(DomainError::user_not_found(user_id));
        }

        // 房间不会被删除，前置检查通过后这里必然命中
        let joined = self
            .registry
            .add_participant(room_id, user_id)
            .await
            .unwrap_or(false);

        if joined {
            info!("用户 {} 加入房间 {}", user_id, room_id);
        } else {
            debug!("用户 {} 已在房间 {} 中", user_id, room_id);
        }
        Ok(joined)
    }

    /// 离开房间。房间不存在或用户不在房间内时静默忽略
    pub async fn leave_room(&self, room_id: RoomId, user_id: UserId) {
        let removed = self
            .registry
            .remove_participant(room_id, user_id)
            .await
            .unwrap_or(false);
        if removed {
            info!("用户 {} 离开房间 {}", user_id, room_id);
        }
    }

    /// 查询房间信息
    pub async fn get_room(&self, room_id: RoomId) -> Option<Room> {
        self.registry.get(room_id).await
    }

    /// 按创建顺序返回全部房间
    pub async fn rooms(&self) -> Vec<Room> {
        self.registry.rooms().await
    }

    /// 发送消息
    ///
    /// 校验通过后追加到房间账本，订阅者全部通知完成后才返回。
    /// 任何一步校验失败都不会留下状态变化。
    pub async fn send_message(&self, request: SendMessageRequest) -> DomainResult<Message> {
        let room = self
            .registry
            .get(request.room_id)
            .await
            .ok_or_else(|| DomainError::room_not_found(request.room_id))?;
        if !self.directory.contains(request.sender_id).await {
            return Err(DomainError::user_not_found(request.sender_id));
        }
        if !room.is_participant(request.sender_id) {
            return Err(DomainError::not_participant(request.room_id, request.sender_id));
        }

        let content = request.content.trim();
        if content.is_empty() {
            return Err(DomainError::invalid_argument("content", "消息内容不能为空"));
        }
        if content.chars().count() > self.limits.max_message_length {
            return Err(DomainError::invalid_argument("content", "消息内容过长"));
        }

        let message = self
            .ledger
            .append(
                request.room_id,
                request.sender_id,
                content.to_string(),
                request.message_type,
            )
            .await;

        info!(
            "用户 {} 向房间 {} 发送消息 {}",
            request.sender_id, request.room_id, message.id
        );
        Ok(message)
    }

    /// 查询房间最近的消息，`limit` 为 None 时返回全部历史
    pub async fn room_messages(&self, room_id: RoomId, limit: Option<usize>) -> Vec<Message> {
        debug!("查询房间 {} 消息, limit={:?}", room_id, limit);
        self.ledger.room_messages(room_id, limit).await
    }

    /// 将消息标记为已读。未知消息ID静默忽略
    pub async fn mark_as_read(&self, message_id: MessageId) {
        if !self.ledger.mark_as_read(message_id).await {
            debug!("标记已读未命中，消息 {} 不存在", message_id);
        }
    }

    /// 注册消息订阅者，每条新消息按注册顺序同步通知
    pub async fn subscribe(&self, subscriber: Arc<dyn MessageSubscriber>) -> SubscriptionId {
        self.bus.subscribe(subscriber).await
    }

    /// 取消订阅，返回凭证是否有效
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id).await
    }
}
