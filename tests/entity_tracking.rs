//! Integration tests for the entity cache driven by the event stream.

mod common;

use common::{avatar_add_handle, avatar_change_handle, bootstrap, record, test_session, FakeHandle};
use worldgate::proto::{Event, FloatAttribute, IntAttribute, StringAttribute};
use worldgate::{EventKind, SessionEvent, WorldState};

#[tokio::test]
async fn test_identical_pose_update_is_suppressed() {
    let (session, _transport) = test_session();
    let changes = record(&session, EventKind::AvatarChanged);
    bootstrap(&session).await;

    session.handle_event(
        Event::AvatarAdd,
        &avatar_add_handle(5, 42, "Bob", (1.0, 2.0, 3.0), (0.0, 0.0)),
    );

    // Same six pose components, different name: must not emit a change
    // event, and must not touch the cache either.
    session.handle_event(
        Event::AvatarChange,
        &avatar_change_handle(5, "Robert", (1.0, 2.0, 3.0), (0.0, 0.0)),
    );

    assert!(changes.lock().unwrap().is_empty());
    assert_eq!(session.avatar(5).name, "Bob");
}

#[tokio::test]
async fn test_single_component_change_emits_exactly_one_event() {
    let (session, _transport) = test_session();
    let changes = record(&session, EventKind::AvatarChanged);
    bootstrap(&session).await;

    session.handle_event(
        Event::AvatarAdd,
        &avatar_add_handle(5, 42, "Bob", (1.0, 2.0, 3.0), (0.0, 0.0)),
    );
    session.handle_event(
        Event::AvatarChange,
        &avatar_change_handle(5, "Bob", (1.0, 2.0, 3.0), (0.0, 45.0)),
    );

    let events = changes.lock().unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        SessionEvent::AvatarChanged { avatar, previous } => {
            assert_eq!(previous.rotation.y, 0.0);
            assert_eq!(avatar.rotation.y, 45.0);
            // The change event carries no user id; the cached one is kept.
            assert_eq!(avatar.user_id, 42);
            assert!(avatar.last_changed.is_some());
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_from_unknown_session_creates_placeholder() {
    let (session, _transport) = test_session();
    let chats = record(&session, EventKind::Chat);
    bootstrap(&session).await;

    let handle = FakeHandle::new()
        .with_int(IntAttribute::AvatarSession, 9)
        .with_int(IntAttribute::ChatType, 0)
        .with_int(IntAttribute::ChatEffects, 0)
        .with_string(StringAttribute::AvatarName, "Mallory")
        .with_string(StringAttribute::ChatMessage, "hello");
    session.handle_event(Event::Chat, &handle);

    let cached = session.avatar(9);
    assert_eq!(cached.name, "Mallory");

    let events = chats.lock().unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        SessionEvent::Chat { avatar, message } => {
            assert_eq!(avatar.session, 9);
            assert_eq!(message.text, "hello");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_mutates_cache_even_without_subscribers() {
    let (session, _transport) = test_session();
    bootstrap(&session).await;

    let handle = FakeHandle::new()
        .with_int(IntAttribute::AvatarSession, 9)
        .with_string(StringAttribute::AvatarName, "Mallory");
    session.handle_event(Event::Chat, &handle);

    assert_eq!(session.avatars().len(), 1);
    assert_eq!(session.avatar(9).name, "Mallory");
}

#[tokio::test]
async fn test_world_setting_before_any_listing_creates_world() {
    let (session, _transport) = test_session();
    let connect = session.connect();
    session.handle_callback(worldgate::proto::Callback::ConnectUniverse, 0, 0, &FakeHandle::new());
    connect.await.unwrap();

    // Enter is in flight: the settings stream starts before its callback.
    let enter = session.enter("Aden");
    session.handle_event(
        Event::WorldSetting,
        &FakeHandle::new()
            .with_string(StringAttribute::WorldSettingKey, "objectpath")
            .with_string(StringAttribute::WorldSettingValue, "/models"),
    );

    let world = session.world("Aden").expect("created by the setting");
    assert_eq!(world.settings.get("objectpath").unwrap(), "/models");
    assert_eq!(world.settings.len(), 1);

    session.handle_callback(worldgate::proto::Callback::Enter, 0, 0, &FakeHandle::new());
    enter.await.unwrap();
}

#[tokio::test]
async fn test_settings_stream_merges_and_announces() {
    let (session, _transport) = test_session();
    let changed = record(&session, EventKind::WorldSettingsChanged);
    bootstrap(&session).await;

    for (key, value) in [("objectpath", "/models"), ("welcome", "hi there")] {
        session.handle_event(
            Event::WorldSetting,
            &FakeHandle::new()
                .with_string(StringAttribute::WorldSettingKey, key)
                .with_string(StringAttribute::WorldSettingValue, value),
        );
    }
    session.handle_event(Event::WorldSettingsChanged, &FakeHandle::new());

    let events = changed.lock().unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        SessionEvent::WorldSettingsChanged { world } => {
            assert_eq!(world.name, "Aden");
            assert_eq!(world.settings.len(), 2);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_world_listing_replaces_previous_entry() {
    let (session, _transport) = test_session();
    let listed = record(&session, EventKind::WorldListed);
    bootstrap(&session).await;

    session.handle_event(
        Event::WorldSetting,
        &FakeHandle::new()
            .with_string(StringAttribute::WorldSettingKey, "objectpath")
            .with_string(StringAttribute::WorldSettingValue, "/models"),
    );

    session.handle_event(
        Event::WorldList,
        &FakeHandle::new()
            .with_string(StringAttribute::WorldName, "Aden")
            .with_int(IntAttribute::WorldState, 1)
            .with_int(IntAttribute::WorldUsers, 12),
    );

    let world = session.world("Aden").unwrap();
    assert_eq!(world.state, WorldState::Online);
    assert_eq!(world.user_count, 12);
    // Replaced, not merged.
    assert!(world.settings.is_empty());
    assert_eq!(listed.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_avatar_click_falls_back_to_clicker() {
    let (session, _transport) = test_session();
    let clicks = record(&session, EventKind::AvatarClicked);
    bootstrap(&session).await;

    session.handle_event(
        Event::AvatarClick,
        &FakeHandle::new()
            .with_int(IntAttribute::AvatarSession, 5)
            .with_int(IntAttribute::ClickedSession, 0)
            .with_float(FloatAttribute::ClickHitX, 1.0)
            .with_float(FloatAttribute::ClickHitY, 0.0)
            .with_float(FloatAttribute::ClickHitZ, 2.0),
    );

    let events = clicks.lock().unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        SessionEvent::AvatarClicked { avatar, clicked, hit } => {
            assert_eq!(avatar.session, 5);
            assert_eq!(clicked.session, 5);
            assert_eq!(hit.x, 1.0);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    // Both lookups went through the placeholder-creating path.
    assert_eq!(session.avatars().len(), 1);
}

#[tokio::test]
async fn test_undecodable_event_is_dropped_not_fatal() {
    let (session, _transport) = test_session();
    bootstrap(&session).await;

    // Avatar-add with no name register: decode fails, nothing is cached.
    session.handle_event(
        Event::AvatarAdd,
        &FakeHandle::new().with_int(IntAttribute::AvatarSession, 5),
    );
    assert!(session.avatars().is_empty());

    // The dispatcher keeps processing subsequent callbacks.
    session.handle_event(
        Event::AvatarAdd,
        &avatar_add_handle(6, 10, "Carol", (0.0, 0.0, 0.0), (0.0, 0.0)),
    );
    assert_eq!(session.avatars().len(), 1);
}

#[tokio::test]
async fn test_teleport_event_carries_world_and_pose() {
    let (session, _transport) = test_session();
    let teleports = record(&session, EventKind::Teleported);
    bootstrap(&session).await;

    session.handle_event(
        Event::Teleport,
        &FakeHandle::new()
            .with_int(IntAttribute::AvatarSession, 5)
            .with_float(FloatAttribute::TeleportX, 10.0)
            .with_float(FloatAttribute::TeleportY, 0.0)
            .with_float(FloatAttribute::TeleportZ, -4.0)
            .with_float(FloatAttribute::TeleportYaw, 180.0)
            .with_float(FloatAttribute::TeleportPitch, 0.0)
            .with_string(StringAttribute::TeleportWorld, "Elsewhere"),
    );

    let events = teleports.lock().unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        SessionEvent::Teleported { teleport } => {
            assert_eq!(teleport.world, "Elsewhere");
            assert_eq!(teleport.position.x, 10.0);
            assert_eq!(teleport.rotation.y, 180.0);
            // Roll stays zero.
            assert_eq!(teleport.rotation.z, 0.0);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_events_of_one_kind_arrive_in_transport_order() {
    let (session, _transport) = test_session();
    let entered = record(&session, EventKind::AvatarEntered);
    bootstrap(&session).await;

    for session_id in 1..=4 {
        session.handle_event(
            Event::AvatarAdd,
            &avatar_add_handle(session_id, 0, &format!("a{session_id}"), (0.0, 0.0, 0.0), (0.0, 0.0)),
        );
    }

    let order: Vec<i32> = entered
        .lock()
        .unwrap()
        .iter()
        .map(|event| match event {
            SessionEvent::AvatarEntered { avatar } => avatar.session,
            other => panic!("unexpected event: {other:?}"),
        })
        .collect();
    assert_eq!(order, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_lookup_by_unknown_session_creates_placeholder() {
    let (session, _transport) = test_session();
    let avatar = session.avatar(31);
    assert_eq!(avatar.session, 31);
    assert_eq!(avatar.name, "");
    assert_eq!(session.avatars().len(), 1);
}
