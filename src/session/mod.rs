//! The session object: one universe connection, its entity caches, its
//! pending operations and its event subscribers.
//!
//! A [`Session`] owns everything the correlation layer needs — there is no
//! process-wide registry, so multiple sessions coexist as independent
//! values. All shared state lives behind one mutex ([`SessionCore`]);
//! the dispatcher acquires it for decode+mutate and releases it before
//! completing futures or invoking subscribers, so a subscriber or an
//! awakened caller can immediately issue new operations without
//! deadlocking.

mod actions;
mod callbacks;
mod dispatch;
mod friends;
mod lifecycle;
mod objects;

pub use actions::UrlTarget;
pub use lifecycle::ConnectionState;

use crate::config::{ConfigError, SessionConfig};
use crate::error::{SessionResult, SessionError};
use crate::events::{EventBus, EventKind, SessionEvent, SubscriptionId};
use crate::state::{
    Avatar, AvatarRegistry, PendingOp, PendingOps, ReferenceAllocator, Outcome, World,
    WorldRegistry,
};
use crate::transport::Transport;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;
use worldgate_proto::{FloatAttribute, IntAttribute};

/// Pending completion of one bootstrap operation.
///
/// The native protocol does not echo a correlation id for connect, login
/// and enter, so each gets a dedicated single slot instead of a pending-
/// table entry.
pub(crate) struct BootstrapSlot {
    pub tx: oneshot::Sender<SessionResult<()>>,
    /// State to restore if the operation fails.
    pub rollback: ConnectionState,
}

/// Everything guarded by the session mutex.
pub(crate) struct SessionCore {
    pub state: ConnectionState,
    pub avatars: AvatarRegistry,
    pub worlds: WorldRegistry,
    pub pending: PendingOps,
    pub connect_slot: Option<BootstrapSlot>,
    pub login_slot: Option<BootstrapSlot>,
    pub enter_slot: Option<BootstrapSlot>,
    /// World named by the most recent enter; target of the settings stream.
    pub current_world: Option<String>,
}

impl SessionCore {
    fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            avatars: AvatarRegistry::new(),
            worlds: WorldRegistry::new(),
            pending: PendingOps::new(),
            connect_slot: None,
            login_slot: None,
            enter_slot: None,
            current_world: None,
        }
    }
}

/// A deferred completion, delivered after the session lock is released.
pub(crate) enum Completion {
    /// A pending-table operation finishing.
    Op(PendingOp, SessionResult<Outcome>),
    /// A bootstrap slot finishing.
    Slot(oneshot::Sender<SessionResult<()>>, SessionResult<()>),
}

impl Completion {
    fn deliver(self) {
        match self {
            // A dropped receiver means the caller went away; nothing to do.
            Completion::Op(op, Ok(outcome)) => op.resolve(outcome),
            Completion::Op(op, Err(err)) => op.reject(err),
            Completion::Slot(tx, result) => {
                let _ = tx.send(result);
            }
        }
    }
}

/// What one dispatched notification wants done once the lock is dropped.
#[derive(Default)]
pub(crate) struct Effects {
    pub event: Option<SessionEvent>,
    pub completions: Vec<Completion>,
}

impl Effects {
    pub(crate) fn none() -> Self {
        Effects {
            event: None,
            completions: Vec::new(),
        }
    }

    pub(crate) fn emit(event: SessionEvent) -> Self {
        Effects {
            event: Some(event),
            completions: Vec::new(),
        }
    }

    pub(crate) fn complete(completion: Completion) -> Self {
        Effects {
            event: None,
            completions: vec![completion],
        }
    }
}

/// A client session over one native transport instance.
pub struct Session {
    pub(crate) core: Mutex<SessionCore>,
    pub(crate) bus: EventBus,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) refs: ReferenceAllocator,
    pub(crate) config: SessionConfig,
}

impl Session {
    /// Create a session over `transport` with a validated configuration.
    pub fn new(config: SessionConfig, transport: Arc<dyn Transport>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            core: Mutex::new(SessionCore::new()),
            bus: EventBus::new(),
            transport,
            refs: ReferenceAllocator::new(),
            config,
        })
    }

    /// The configuration this session was built from.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.core.lock().state
    }

    /// The session's event bus.
    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe to one kind of domain event.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(kind, handler)
    }

    /// Detach one subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Detach every subscriber (teardown). The session stays usable.
    pub fn release_subscribers(&self) {
        self.bus.release_all();
    }

    /// Snapshot of all currently known avatars.
    pub fn avatars(&self) -> Vec<Avatar> {
        self.core.lock().avatars.list()
    }

    /// Look up an avatar by session id, creating a placeholder entry if the
    /// session is unknown.
    pub fn avatar(&self, session: i32) -> Avatar {
        self.core.lock().avatars.get_or_create(session)
    }

    /// Look up a world by name.
    pub fn world(&self, name: &str) -> Option<World> {
        self.core.lock().worlds.get(name)
    }

    /// Snapshot of all worlds seen so far.
    pub fn worlds(&self) -> Vec<World> {
        self.core.lock().worlds.list()
    }

    /// Number of outstanding solicited operations. A value that keeps
    /// growing indicates leaked registrations.
    pub fn pending_operations(&self) -> usize {
        self.core.lock().pending.len()
    }

    /// The own avatar, read back from the transport's instance registers.
    pub fn my_avatar(&self) -> SessionResult<Avatar> {
        let t = self.transport.as_ref();
        Ok(Avatar {
            session: 0,
            user_id: t.get_int(IntAttribute::MyUserId)?,
            name: self.config.credentials.bot_name.clone(),
            avatar_type: t.get_int(IntAttribute::MyType)?,
            position: worldgate_proto::Vector3::new(
                t.get_float(FloatAttribute::MyX)?,
                t.get_float(FloatAttribute::MyY)?,
                t.get_float(FloatAttribute::MyZ)?,
            ),
            // Roll is unsupported; it stays zero.
            rotation: worldgate_proto::Vector3::new(
                t.get_float(FloatAttribute::MyPitch)?,
                t.get_float(FloatAttribute::MyYaw)?,
                0.0,
            ),
            last_changed: Some(Utc::now()),
            extensions: Default::default(),
        })
    }

    /// Run deferred completions and publish the event, strictly after the
    /// session lock has been released.
    pub(crate) fn run_effects(&self, effects: Effects) {
        for completion in effects.completions {
            completion.deliver();
        }
        if let Some(event) = effects.event {
            self.bus.publish(&event);
        }
    }

    /// Flatten a started bootstrap operation into its final result.
    pub(crate) async fn await_slot(
        started: SessionResult<oneshot::Receiver<SessionResult<()>>>,
    ) -> SessionResult<()> {
        match started {
            Err(err) => Err(err),
            Ok(rx) => rx.await.unwrap_or(Err(SessionError::Terminated)),
        }
    }

    /// Flatten a started solicited operation into its final outcome.
    pub(crate) async fn await_outcome(
        started: SessionResult<oneshot::Receiver<SessionResult<Outcome>>>,
    ) -> SessionResult<Outcome> {
        match started {
            Err(err) => Err(err),
            Ok(rx) => rx.await.unwrap_or(Err(SessionError::Terminated)),
        }
    }
}
