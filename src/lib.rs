//! # worldgate
//!
//! A client-side session layer for a virtual-world network protocol.
//!
//! The native transport underneath is callback-driven and single-slot: it
//! invokes registered functions on its own thread, at arbitrary times, and
//! echoes at most one correlation id per solicited answer. This crate turns
//! that into a coherent asynchronous API with consistent local state:
//!
//! - **Correlation**: every solicited operation registers a correlation id
//!   before its request is sent; the matching callback resolves exactly one
//!   awaitable outcome. Late or unknown answers are logged and discarded.
//! - **Entity cache**: avatars (by session id) and worlds (by name) are
//!   maintained from the live event stream, linearized by one lock per
//!   session, and exposed as snapshots.
//! - **Bootstrap sequencing**: connect, login and enter-world are
//!   serialized single-slot operations; a second same-kind call fails with
//!   [`SessionError::AlreadyInProgress`] instead of losing the first
//!   caller's result.
//! - **Events**: every pushed notification fans out as a typed
//!   [`SessionEvent`] to subscribers, in transport order, with per-handler
//!   panic isolation.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use worldgate::{EventKind, Session, SessionConfig, SessionEvent};
//!
//! # async fn run(transport: Arc<dyn worldgate::Transport>) -> worldgate::SessionResult<()> {
//! let config = SessionConfig::load("worldgate.toml").expect("config");
//! let session = Arc::new(Session::new(config, transport).expect("config validated"));
//!
//! session.subscribe(EventKind::Chat, |event| {
//!     if let SessionEvent::Chat { avatar, message } = event {
//!         println!("{}: {}", avatar.name, message.text);
//!     }
//! });
//!
//! session.login_and_enter(true).await?;
//! session.say("hello, world").unwrap();
//! # Ok(())
//! # }
//! ```
//!
//! Wire decoding, geometry and persistence live elsewhere: the transport is
//! consumed through the [`Transport`] and [`AttributeReader`] traits, and
//! this layer keeps no state beyond process memory.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod transport;

pub use config::{ConfigError, CredentialsConfig, SessionConfig, UniverseConfig, WorldConfig};
pub use error::{BootstrapKind, SessionError, SessionResult};
pub use events::{EventBus, EventKind, SessionEvent, SubscriptionId};
pub use session::{ConnectionState, Session, UrlTarget};
pub use state::{
    Avatar, BumpPhase, Cell, ChatKind, ChatMessage, Color, DisconnectReason, Extensions, Friend,
    JoinRequest, Teleport, UserAttributes, World, WorldObject, WorldState,
};
pub use transport::{AttributeReader, Transport};

// Re-export the protocol vocabulary so applications need only one import.
pub use worldgate_proto as proto;
