mod chat_service;
mod stats_service;
mod user_service;

#[cfg(test)]
mod stats_service_tests;

pub use chat_service::{
    ChatService, ChatServiceDependencies, CreateRoomRequest, SendMessageRequest,
};
pub use stats_service::{ChatStatistics, StatsService};
pub use user_service::{RegisterUserRequest, UserService, UserServiceDependencies};
