//! The three serialized bootstrap operations and session teardown.
//!
//! ## State machine
//!
//! ```text
//! Disconnected --connect--> Connecting --(ok)--> Connected
//! Connected --login--> Authenticating --(ok)--> Connected
//! Connected --enter--> EnteringWorld --(ok)--> InWorld
//! ```
//!
//! A failed step restores the state it started from and surfaces the error
//! to the caller; nothing is left half-finished silently. The native
//! protocol keeps a single completion slot per bootstrap kind, so a second
//! same-kind call while one is outstanding fails with
//! [`SessionError::AlreadyInProgress`] instead of overwriting the first
//! caller's pending result.

use super::{BootstrapSlot, Completion, Effects, Session, SessionCore};
use crate::error::{check_reason, BootstrapKind, SessionError, SessionResult};
use crate::events::SessionEvent;
use crate::state::DisconnectReason;
use crate::telemetry::OpTimer;
use std::future::Future;
use tokio::sync::oneshot;
use worldgate_proto::{FloatAttribute, Vector3};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No universe connection.
    #[default]
    Disconnected,
    /// Universe connect sent, awaiting its callback.
    Connecting,
    /// Universe connection up (authenticated or not).
    Connected,
    /// Login sent, awaiting its callback.
    Authenticating,
    /// World enter sent, awaiting its callback.
    EnteringWorld,
    /// Inside a world.
    InWorld,
}

impl Session {
    /// Connect to the configured universe endpoint.
    pub fn connect(&self) -> impl Future<Output = SessionResult<()>> + Send + use<> {
        let timer = OpTimer::new("connect");
        let started =
            self.start_bootstrap(BootstrapKind::Connect, ConnectionState::Connecting, |s, _| {
                s.transport
                    .connect_universe(&s.config.universe.host, s.config.universe.port)
            });
        async move {
            let _timer = timer;
            Self::await_slot(started).await
        }
    }

    /// Authenticate with the configured credentials.
    pub fn login(&self) -> impl Future<Output = SessionResult<()>> + Send + use<> {
        let timer = OpTimer::new("login");
        let started = self.start_bootstrap(
            BootstrapKind::Login,
            ConnectionState::Authenticating,
            |s, _| {
                s.transport.login(
                    &s.config.credentials.username,
                    &s.config.credentials.password,
                    &s.config.credentials.bot_name,
                )
            },
        );
        async move {
            let _timer = timer;
            Self::await_slot(started).await
        }
    }

    /// Enter a world by name.
    pub fn enter(&self, world: &str) -> impl Future<Output = SessionResult<()>> + Send + use<> {
        let timer = OpTimer::new("enter");
        let name = world.to_string();
        let started = self.start_bootstrap(
            BootstrapKind::Enter,
            ConnectionState::EnteringWorld,
            move |s, core| {
                // Record the target before sending: the settings stream that
                // follows a successful enter merges into this world, and
                // entries may arrive before the enter callback itself.
                core.current_world = Some(name.clone());
                let entry = core.worlds.ensure(&name);
                if entry.local_cache_path.is_none() {
                    entry.local_cache_path = s.config.world.local_cache_path.clone();
                }
                s.transport.enter(&name)
            },
        );
        async move {
            let _timer = timer;
            Self::await_slot(started).await
        }
    }

    /// Enter the world named in the configuration.
    pub fn enter_configured(&self) -> impl Future<Output = SessionResult<()>> + Send + use<> {
        let started = match self.config.world.name.clone() {
            Some(name) => Ok(self.enter(&name)),
            None => Err(SessionError::Misconfigured("no world configured")),
        };
        async move {
            match started {
                Ok(fut) => fut.await,
                Err(err) => Err(err),
            }
        }
    }

    /// Run the full bootstrap: connect, login, enter the configured world,
    /// then optionally announce the avatar at the origin.
    ///
    /// The steps run sequentially; the first failure aborts the rest.
    pub async fn login_and_enter(&self, announce_avatar: bool) -> SessionResult<()> {
        self.connect().await?;
        self.login().await?;
        self.enter_configured().await?;
        if announce_avatar {
            self.update_avatar(Vector3::ZERO, Vector3::ZERO)?;
        }
        Ok(())
    }

    /// Leave the current world. Synchronous: the transport acknowledges
    /// with its result code, not a callback.
    pub fn leave(&self) -> SessionResult<()> {
        let effects = {
            let mut core = self.core.lock();
            check_reason(self.transport.leave())?;
            if core.state == ConnectionState::InWorld {
                core.state = ConnectionState::Connected;
            }
            match core
                .current_world
                .as_deref()
                .and_then(|name| core.worlds.get(name))
            {
                Some(world) => Effects::emit(SessionEvent::WorldLeft { world }),
                None => Effects::none(),
            }
        };
        self.run_effects(effects);
        Ok(())
    }

    /// Tear down the universe connection.
    ///
    /// Clears the avatar cache, rejects every in-flight operation with
    /// [`SessionError::Terminated`] and publishes
    /// [`SessionEvent::UniverseDisconnected`]. The session may connect
    /// again afterwards.
    pub fn disconnect(&self) {
        let rc = self.transport.disconnect();
        if rc != 0 {
            tracing::warn!(rc, "transport disconnect reported an error");
        }
        let effects = {
            let mut core = self.core.lock();
            let mut effects = core.abandon_in_flight();
            core.avatars.clear();
            core.current_world = None;
            core.state = ConnectionState::Disconnected;
            effects.event = Some(SessionEvent::UniverseDisconnected {
                reason: DisconnectReason::UserInitiated,
            });
            effects
        };
        self.run_effects(effects);
    }

    /// Announce the own avatar's position and rotation to the world.
    pub fn update_avatar(&self, position: Vector3, rotation: Vector3) -> SessionResult<()> {
        let _core = self.core.lock();
        let t = self.transport.as_ref();
        t.set_float(FloatAttribute::MyX, position.x);
        t.set_float(FloatAttribute::MyY, position.y);
        t.set_float(FloatAttribute::MyZ, position.z);
        t.set_float(FloatAttribute::MyYaw, rotation.y);
        t.set_float(FloatAttribute::MyPitch, rotation.x);
        check_reason(t.state_change())
    }

    /// Shared start path for the three bootstrap kinds: claim the slot and
    /// send under one lock hold, so the completion is registered before the
    /// callback can possibly arrive, then roll back on a synchronous
    /// failure.
    fn start_bootstrap(
        &self,
        kind: BootstrapKind,
        transitional: ConnectionState,
        send: impl FnOnce(&Session, &mut SessionCore) -> i32,
    ) -> SessionResult<oneshot::Receiver<SessionResult<()>>> {
        let mut core = self.core.lock();
        if core.slot(kind).is_some() {
            return Err(SessionError::AlreadyInProgress(kind));
        }
        let rollback = core.state;
        let (tx, rx) = oneshot::channel();
        *core.slot(kind) = Some(BootstrapSlot { tx, rollback });
        core.state = transitional;

        let rc = send(self, &mut core);
        if rc != 0 {
            *core.slot(kind) = None;
            core.state = rollback;
            return Err(SessionError::rejected(rc));
        }
        Ok(rx)
    }
}

impl SessionCore {
    /// The dedicated slot for one bootstrap kind.
    pub(crate) fn slot(&mut self, kind: BootstrapKind) -> &mut Option<BootstrapSlot> {
        match kind {
            BootstrapKind::Connect => &mut self.connect_slot,
            BootstrapKind::Login => &mut self.login_slot,
            BootstrapKind::Enter => &mut self.enter_slot,
        }
    }

    /// Remove every in-flight completion (pending table and bootstrap
    /// slots) for rejection with `Terminated` once the lock is released.
    pub(crate) fn abandon_in_flight(&mut self) -> Effects {
        let mut effects = Effects::none();
        for op in self.pending.drain() {
            effects
                .completions
                .push(Completion::Op(op, Err(SessionError::Terminated)));
        }
        for kind in [
            BootstrapKind::Connect,
            BootstrapKind::Login,
            BootstrapKind::Enter,
        ] {
            if let Some(slot) = self.slot(kind).take() {
                effects
                    .completions
                    .push(Completion::Slot(slot.tx, Err(SessionError::Terminated)));
            }
        }
        effects
    }
}
