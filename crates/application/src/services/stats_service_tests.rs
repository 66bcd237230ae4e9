//! 统计服务单元测试

#[cfg(test)]
mod stats_service_tests {
    use crate::broadcaster::EventBus;
    use crate::clock::{Clock, SystemClock};
    use crate::directory::UserDirectory;
    use crate::ledger::MessageLedger;
    use crate::registry::RoomRegistry;
    use crate::services::chat_service::{ChatService, ChatServiceDependencies, CreateRoomRequest, SendMessageRequest};
    use crate::services::stats_service::{ChatStatistics, StatsService};
    use crate::services::user_service::{RegisterUserRequest, UserService, UserServiceDependencies};
    use config::LimitsConfig;
    use domain::{RoomId, UserId};
    use std::sync::Arc;

    struct TestServices {
        users: UserService,
        chat: ChatService,
        stats: StatsService,
    }

    fn create_test_services() -> TestServices {
        let directory = Arc::new(UserDirectory::new());
        let registry = Arc::new(RoomRegistry::new());
        let bus = Arc::new(EventBus::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ledger = Arc::new(MessageLedger::new(clock.clone(), bus.clone()));
        let limits = LimitsConfig::default();

        TestServices {
            users: UserService::new(UserServiceDependencies {
                directory: directory.clone(),
                limits: limits.clone(),
            }),
            chat: ChatService::new(ChatServiceDependencies {
                directory: directory.clone(),
                registry: registry.clone(),
                ledger: ledger.clone(),
                bus,
                clock,
                limits,
            }),
            stats: StatsService::new(directory, registry, ledger),
        }
    }

    async fn register_user(services: &TestServices, username: &str) -> UserId {
        services
            .users
            .register_user(RegisterUserRequest {
                username: username.to_string(),
                email: format!("{}@example.com", username),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_empty_engine_statistics() {
        let services = create_test_services();

        let statistics = services.stats.get_statistics().await;
        assert_eq!(
            statistics,
            ChatStatistics {
                total_users: 0,
                online_users: 0,
                total_rooms: 0,
                total_messages: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_statistics_reflect_presence() {
        let services = create_test_services();
        let alice = register_user(&services, "alice").await;
        let bob = register_user(&services, "bob").await;
        register_user(&services, "carol").await;

        services.users.login(alice).await;
        services.users.login(bob).await;
        services.users.logout(bob).await;

        let statistics = services.stats.get_statistics().await;
        assert_eq!(statistics.total_users, 3);
        assert_eq!(statistics.online_users, 1);
    }

    #[tokio::test]
    async fn test_total_messages_spans_rooms() {
        let services = create_test_services();
        let alice = register_user(&services, "alice").await;

        let first_room = services
            .chat
            .create_room(CreateRoomRequest {
                name: "房间一".to_string(),
                creator_id: alice,
            })
            .await
            .unwrap()
            .id;
        let second_room = services
            .chat
            .create_room(CreateRoomRequest {
                name: "房间二".to_string(),
                creator_id: alice,
            })
            .await
            .unwrap()
            .id;

        for _ in 0..3 {
            services
                .chat
                .send_message(SendMessageRequest::text(first_room, alice, "消息"))
                .await
                .unwrap();
        }
        for _ in 0..2 {
            services
                .chat
                .send_message(SendMessageRequest::text(second_room, alice, "消息"))
                .await
                .unwrap();
        }

        let statistics = services.stats.get_statistics().await;
        assert_eq!(statistics.total_rooms, 2);
        assert_eq!(statistics.total_messages, 5);
    }

    #[tokio::test]
    async fn test_statistics_have_no_side_effects() {
        let services = create_test_services();
        let alice = register_user(&services, "alice").await;
        services.users.login(alice).await;

        let first = services.stats.get_statistics().await;
        let second = services.stats.get_statistics().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_room_counts_zero_messages() {
        let services = create_test_services();
        let alice = register_user(&services, "alice").await;
        services
            .chat
            .create_room(CreateRoomRequest {
                name: "空房间".to_string(),
                creator_id: alice,
            })
            .await
            .unwrap();

        let statistics = services.stats.get_statistics().await;
        assert_eq!(statistics.total_rooms, 1);
        assert_eq!(statistics.total_messages, 0);
        // 空房间的历史查询同样为空
        assert!(services
            .chat
            .room_messages(RoomId::new(1), None)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_statistics_serialization() {
        let statistics = ChatStatistics {
            total_users: 3,
            online_users: 2,
            total_rooms: 1,
            total_messages: 7,
        };

        let json = serde_json::to_string(&statistics).unwrap();
        assert!(json.contains("\"total_messages\":7"));

        let deserialized: ChatStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(statistics, deserialized);
    }
}
