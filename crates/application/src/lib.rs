//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务，处理输入校验、并发控制
//! 以及消息事件的同步分发。

pub mod broadcaster;
pub mod clock;
pub mod directory;
pub mod ledger;
pub mod registry;
pub mod services;

pub use broadcaster::{
    EventBus, MessageBroadcast, MessageSubscriber, SubscriberError, SubscriptionId,
};
pub use clock::{Clock, SystemClock};
pub use directory::UserDirectory;
pub use ledger::MessageLedger;
pub use registry::RoomRegistry;
pub use services::{
    ChatService, ChatServiceDependencies, ChatStatistics, CreateRoomRequest, RegisterUserRequest,
    SendMessageRequest, StatsService, UserService, UserServiceDependencies,
};
