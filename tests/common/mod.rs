//! Shared test harness: a scriptable fake transport, callback handles and
//! an event recorder.

#![allow(dead_code)]

mod handles;
mod transport;

pub use handles::{
    avatar_add_handle, avatar_change_handle, avatar_delete_handle, friend_handle, object_handle,
    FakeHandle,
};
pub use transport::FakeTransport;

use std::sync::{Arc, Mutex};
use worldgate::proto::Callback;
use worldgate::{
    CredentialsConfig, EventKind, Session, SessionConfig, SessionEvent, UniverseConfig,
    WorldConfig,
};

/// Install a compact test subscriber once, honoring `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A session over a fresh fake transport, configured for world "Aden".
pub fn test_session() -> (Arc<Session>, Arc<FakeTransport>) {
    init_tracing();
    let transport = FakeTransport::new();
    let config = SessionConfig {
        universe: UniverseConfig {
            host: "universe.test".to_string(),
            port: 57_000,
        },
        credentials: CredentialsConfig {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            bot_name: "testbot".to_string(),
        },
        world: WorldConfig {
            name: Some("Aden".to_string()),
            local_cache_path: None,
        },
    };
    let transport_handle: Arc<dyn worldgate::Transport> = transport.clone();
    let session = Session::new(config, transport_handle).expect("valid config");
    (Arc::new(session), transport)
}

/// Record every event of one kind into a shared vector.
pub fn record(session: &Session, kind: EventKind) -> Arc<Mutex<Vec<SessionEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    session.subscribe(kind, move |event| {
        sink.lock().unwrap().push(event.clone());
    });
    events
}

/// Drive the full bootstrap against the fake transport: start each step
/// and immediately deliver its success callback.
pub async fn bootstrap(session: &Session) {
    let connect = session.connect();
    session.handle_callback(Callback::ConnectUniverse, 0, 0, &FakeHandle::new());
    connect.await.expect("connect");

    let login = session.login();
    session.handle_callback(Callback::Login, 0, 0, &FakeHandle::new());
    login.await.expect("login");

    let enter = session.enter("Aden");
    session.handle_callback(Callback::Enter, 0, 0, &FakeHandle::new());
    enter.await.expect("enter");
}
