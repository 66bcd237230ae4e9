//! 用户目录
//!
//! 维护全部注册用户与在线状态，分配严格递增的用户ID。
//! 用户只增不删，ID分配在写锁内完成，ID顺序即注册顺序。

use domain::{User, UserId};
use std::collections::HashMap;
use tokio::sync::RwLock;

struct DirectoryState {
    users: HashMap<UserId, User>,
    order: Vec<UserId>,
    next_id: u64,
}

/// 用户目录，进程内唯一的用户存储
pub struct UserDirectory {
    state: RwLock<DirectoryState>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DirectoryState {
                users: HashMap::new(),
                order: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// 写入新用户并返回完整实体
    pub async fn insert(&self, username: String, email: String) -> User {
        let mut state = self.state.write().await;
        let id = UserId::new(state.next_id);
        state.next_id += 1;

        let user = User::new(id, username, email);
        state.users.insert(id, user.clone());
        state.order.push(id);
        user
    }

    pub async fn get(&self, user_id: UserId) -> Option<User> {
        self.state.read().await.users.get(&user_id).cloned()
    }

    pub async fn contains(&self, user_id: UserId) -> bool {
        self.state.read().await.users.contains_key(&user_id)
    }

    /// 更新在线状态，返回更新后的实体。用户不存在时返回 None
    pub async fn set_online(&self, user_id: UserId, online: bool) -> Option<User> {
        let mut state = self.state.write().await;
        let user = state.users.get_mut(&user_id)?;
        if online {
            user.mark_online();
        } else {
            user.mark_offline();
        }
        Some(user.clone())
    }

    /// 按注册顺序返回当前在线的用户
    pub async fn online_users(&self) -> Vec<User> {
        let state = self.state.read().await;
        state
            .order
            .iter()
            .filter_map(|id| state.users.get(id))
            .filter(|user| user.is_online)
            .cloned()
            .collect()
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn online_count(&self) -> usize {
        self.state
            .read()
            .await
            .users
            .values()
            .filter(|user| user.is_online)
            .count()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}
