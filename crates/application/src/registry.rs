//! 房间注册表
//!
//! 维护全部房间及其成员关系，分配严格递增的房间ID。
//! 房间只增不删。

use domain::{Room, RoomId, Timestamp, UserId};
use std::collections::HashMap;
use tokio::sync::RwLock;

struct RegistryState {
    rooms: HashMap<RoomId, Room>,
    order: Vec<RoomId>,
    next_id: u64,
}

/// 房间注册表，进程内唯一的房间存储
pub struct RoomRegistry {
    state: RwLock<RegistryState>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState {
                rooms: HashMap::new(),
                order: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// 写入新房间并返回完整实体，创建者自动成为首个成员
    pub async fn insert(&self, name: String, creator_id: UserId, created_at: Timestamp) -> Room {
        let mut state = self.state.write().await;
        let id = RoomId::new(state.next_id);
        state.next_id += 1;

        let room = Room::new(id, name, creator_id, created_at);
        state.rooms.insert(id, room.clone());
        state.order.push(id);
        room
    }

    pub async fn get(&self, room_id: RoomId) -> Option<Room> {
        self.state.read().await.rooms.get(&room_id).cloned()
    }

    pub async fn contains(&self, room_id: RoomId) -> bool {
        self.state.read().await.rooms.contains_key(&room_id)
    }

    /// 将用户加入房间，返回是否为新成员。房间不存在时返回 None
    pub async fn add_participant(&self, room_id: RoomId, user_id: UserId) -> Option<bool> {
        let mut state = self.state.write().await;
        let room = state.rooms.get_mut(&room_id)?;
        Some(room.add_participant(user_id))
    }

    /// 将用户移出房间，返回是否实际移除。房间不存在时返回 None
    pub async fn remove_participant(&self, room_id: RoomId, user_id: UserId) -> Option<bool> {
        let mut state = self.state.write().await;
        let room = state.rooms.get_mut(&room_id)?;
        Some(room.remove_participant(user_id))
    }

    /// 检查用户是否为房间成员，房间不存在视为否
    pub async fn is_participant(&self, room_id: RoomId, user_id: UserId) -> bool {
        self.state
            .read()
            .await
            .rooms
            .get(&room_id)
            .map(|room| room.is_participant(user_id))
            .unwrap_or(false)
    }

    pub async fn room_count(&self) -> usize {
        self.state.read().await.rooms.len()
    }

    /// 按创建顺序返回全部房间
    pub async fn rooms(&self) -> Vec<Room> {
        let state = self.state.read().await;
        state
            .order
            .iter()
            .filter_map(|id| state.rooms.get(id))
            .cloned()
            .collect()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
