//! 并发一致性测试
//!
//! 验证并发注册与并发发送下的ID连续性、房间内顺序与统计口径。

use std::sync::Arc;

use application::{
    ChatService, ChatServiceDependencies, Clock, CreateRoomRequest, EventBus, MessageLedger,
    RegisterUserRequest, RoomRegistry, SendMessageRequest, StatsService, SystemClock,
    UserDirectory, UserService, UserServiceDependencies,
};
use config::LimitsConfig;
use domain::{MessageId, UserId};

/// 测试辅助结构：封装可在任务间共享的服务句柄
struct TestServices {
    users: Arc<UserService>,
    chat: Arc<ChatService>,
    stats: Arc<StatsService>,
}

impl TestServices {
    fn new() -> Self {
        // 重复初始化日志订阅器是无害的
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();

        let directory = Arc::new(UserDirectory::new());
        let registry = Arc::new(RoomRegistry::new());
        let bus = Arc::new(EventBus::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ledger = Arc::new(MessageLedger::new(clock.clone(), bus.clone()));
        let limits = LimitsConfig::default();

        Self {
            users: Arc::new(UserService::new(UserServiceDependencies {
                directory: directory.clone(),
                limits: limits.clone(),
            })),
            chat: Arc::new(ChatService::new(ChatServiceDependencies {
                directory: directory.clone(),
                registry: registry.clone(),
                ledger: ledger.clone(),
                bus,
                clock,
                limits,
            })),
            stats: Arc::new(StatsService::new(directory, registry, ledger)),
        }
    }

    async fn register(&self, username: &str) -> UserId {
        self.users
            .register_user(RegisterUserRequest {
                username: username.to_string(),
                email: format!("{}@example.com", username),
            })
            .await
            .unwrap()
            .id
    }
}

/// 并发注册不产生ID空洞或重复
#[tokio::test]
async fn test_concurrent_registrations_yield_gapless_ids(
) -> Result<(), Box<dyn std::error::Error>> {
    let services = TestServices::new();

    let tasks: Vec<_> = (0..50)
        .map(|i| {
            let users = services.users.clone();
            tokio::spawn(async move {
                users
                    .register_user(RegisterUserRequest {
                        username: format!("user{}", i),
                        email: format!("user{}@example.com", i),
                    })
                    .await
            })
        })
        .collect();

    let mut ids: Vec<u64> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().id.value())
        .collect();
    ids.sort_unstable();

    let expected: Vec<u64> = (1..=50).collect();
    assert_eq!(ids, expected);

    println!("✅ 并发注册ID连续性测试通过");
    Ok(())
}

/// 并发发送时单个房间内消息严格有序
#[tokio::test]
async fn test_concurrent_sends_keep_room_ordered() -> Result<(), Box<dyn std::error::Error>> {
    let services = TestServices::new();
    let creator = services.register("creator").await;
    let room = services
        .chat
        .create_room(CreateRoomRequest {
            name: "压测房间".to_string(),
            creator_id: creator,
        })
        .await?;

    let mut senders = vec![creator];
    for i in 0..9 {
        let sender = services.register(&format!("sender{}", i)).await;
        services.chat.join_room(room.id, sender).await?;
        senders.push(sender);
    }

    // 10个成员并发各发10条
    let tasks: Vec<_> = senders
        .into_iter()
        .map(|sender| {
            let chat = services.chat.clone();
            let room_id = room.id;
            tokio::spawn(async move {
                for n in 0..10 {
                    chat.send_message(SendMessageRequest::text(
                        room_id,
                        sender,
                        format!("第{}条", n),
                    ))
                    .await
                    .unwrap();
                }
            })
        })
        .collect();

    for joined in futures::future::join_all(tasks).await {
        joined.unwrap();
    }

    let history = services.chat.room_messages(room.id, None).await;
    assert_eq!(history.len(), 100);

    // 单房间独占全部ID，日志内ID连续且时间单调不减
    for (index, message) in history.iter().enumerate() {
        assert_eq!(message.id, MessageId::new(index as u64 + 1));
    }
    for window in history.windows(2) {
        assert!(window[0].sent_at <= window[1].sent_at);
    }

    println!("✅ 单房间并发顺序测试通过");
    Ok(())
}

/// 两个房间并行发送互不阻塞，消息ID全局唯一
#[tokio::test]
async fn test_rooms_progress_independently() -> Result<(), Box<dyn std::error::Error>> {
    let services = TestServices::new();
    let sender = services.register("sender").await;

    let mut room_ids = Vec::new();
    for name in ["房间一", "房间二"] {
        let room = services
            .chat
            .create_room(CreateRoomRequest {
                name: name.to_string(),
                creator_id: sender,
            })
            .await?;
        room_ids.push(room.id);
    }

    let tasks: Vec<_> = room_ids
        .iter()
        .map(|&room_id| {
            let chat = services.chat.clone();
            tokio::spawn(async move {
                for n in 0..25 {
                    chat.send_message(SendMessageRequest::text(
                        room_id,
                        sender,
                        format!("第{}条", n),
                    ))
                    .await
                    .unwrap();
                }
            })
        })
        .collect();

    for joined in futures::future::join_all(tasks).await {
        joined.unwrap();
    }

    // 每个房间内部ID严格递增
    let mut all_ids = Vec::new();
    for &room_id in &room_ids {
        let history = services.chat.room_messages(room_id, None).await;
        assert_eq!(history.len(), 25);
        for window in history.windows(2) {
            assert!(window[0].id < window[1].id);
        }
        all_ids.extend(history.into_iter().map(|m| m.id.value()));
    }

    // 两个房间合并后恰好用完 1..=50，无重复无空洞
    all_ids.sort_unstable();
    let expected: Vec<u64> = (1..=50).collect();
    assert_eq!(all_ids, expected);

    println!("✅ 多房间并行测试通过");
    Ok(())
}

/// 混合负载后统计与真实状态一致
#[tokio::test]
async fn test_statistics_stay_consistent_under_load() -> Result<(), Box<dyn std::error::Error>> {
    let services = TestServices::new();
    let host = services.register("host").await;
    let room = services
        .chat
        .create_room(CreateRoomRequest {
            name: "大厅".to_string(),
            creator_id: host,
        })
        .await?;

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let users = services.users.clone();
            let chat = services.chat.clone();
            let room_id = room.id;
            tokio::spawn(async move {
                let user = users
                    .register_user(RegisterUserRequest {
                        username: format!("guest{}", i),
                        email: format!("guest{}@example.com", i),
                    })
                    .await
                    .unwrap();
                users.login(user.id).await;
                chat.join_room(room_id, user.id).await.unwrap();
                chat.send_message(SendMessageRequest::text(room_id, user.id, "签到"))
                    .await
                    .unwrap();
                if i % 2 == 0 {
                    users.logout(user.id).await;
                }
            })
        })
        .collect();

    for joined in futures::future::join_all(tasks).await {
        joined.unwrap();
    }

    let statistics = services.stats.get_statistics().await;
    assert_eq!(statistics.total_users, 21);
    assert_eq!(statistics.online_users, 10);
    assert_eq!(statistics.total_rooms, 1);
    assert_eq!(statistics.total_messages, 20);

    let room_after = services.chat.get_room(room.id).await.unwrap();
    assert_eq!(room_after.participant_count(), 21);

    println!("✅ 混合负载统计一致性测试通过");
    Ok(())
}
