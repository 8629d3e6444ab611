//! Session-owned state: entity caches, correlation allocator, pending table.
//!
//! Everything in this module lives behind the session mutex; none of the
//! registries carry their own locks.

mod avatars;
mod pending;
mod refnum;
mod types;
mod worlds;

pub use avatars::{Avatar, AvatarRegistry};
pub use types::{
    BumpPhase, Cell, ChatKind, ChatMessage, Color, DisconnectReason, Extensions, Friend,
    JoinRequest, Teleport, UserAttributes, WorldObject,
};
pub use worlds::{World, WorldRegistry, WorldState};

pub(crate) use pending::{OpKind, Outcome, PendingOp, PendingOps};
pub(crate) use refnum::ReferenceAllocator;
