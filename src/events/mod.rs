//! Typed domain events and their subscriber bus.
//!
//! The dispatcher translates native notifications into [`SessionEvent`]
//! values and publishes them on the session's [`EventBus`]. Payloads are
//! immutable snapshots: a subscriber can hold on to them without observing
//! later cache mutations.

mod bus;

pub use bus::{EventBus, SubscriptionId};

use crate::state::{
    Avatar, BumpPhase, Cell, ChatMessage, DisconnectReason, Friend, JoinRequest, Teleport,
    UserAttributes, World, WorldObject,
};
use worldgate_proto::Vector3;

/// A domain event fanned out to subscribers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A chat line arrived.
    Chat {
        /// The speaking avatar (placeholder if unseen before).
        avatar: Avatar,
        /// The chat payload.
        message: ChatMessage,
    },
    /// An avatar entered the world.
    AvatarEntered {
        /// The new avatar.
        avatar: Avatar,
    },
    /// An avatar's pose changed.
    AvatarChanged {
        /// State after the update.
        avatar: Avatar,
        /// State before the update.
        previous: Avatar,
    },
    /// An avatar left the world.
    AvatarLeft {
        /// The avatar's last known state.
        avatar: Avatar,
    },
    /// An avatar was clicked.
    AvatarClicked {
        /// The clicking avatar.
        avatar: Avatar,
        /// The clicked avatar.
        clicked: Avatar,
        /// World-space hit point.
        hit: Vector3,
    },
    /// An object was built or changed hands.
    ObjectCreated {
        /// The building avatar.
        builder: Avatar,
        /// The new object.
        object: WorldObject,
    },
    /// An object was modified.
    ObjectChanged {
        /// The modifying avatar.
        builder: Avatar,
        /// The object after the change.
        object: WorldObject,
    },
    /// An object was deleted.
    ObjectDeleted {
        /// The deleting avatar.
        builder: Avatar,
        /// Id of the removed object.
        object_id: i32,
    },
    /// An object was clicked.
    ObjectClicked {
        /// The clicking avatar.
        avatar: Avatar,
        /// Id of the clicked object.
        object_id: i32,
        /// World-space hit point.
        hit: Vector3,
    },
    /// An avatar bumped into an object (or stopped).
    ObjectBumped {
        /// The bumping avatar.
        avatar: Avatar,
        /// Id of the bumped object.
        object_id: i32,
        /// Whether contact began or ended.
        phase: BumpPhase,
    },
    /// One object streamed back from a cell query.
    CellObject {
        /// The decoded object.
        object: WorldObject,
    },
    /// A cell query finished streaming.
    CellEnd {
        /// The queried cell.
        cell: Cell,
    },
    /// One entry of a universe world list.
    WorldListed {
        /// The listed world snapshot.
        world: World,
    },
    /// The settings stream of the current world completed.
    WorldSettingsChanged {
        /// The merged world snapshot.
        world: World,
    },
    /// A world was entered.
    WorldEntered {
        /// The entered world snapshot.
        world: World,
    },
    /// The current world was left.
    WorldLeft {
        /// The left world snapshot.
        world: World,
    },
    /// The world server dropped the connection.
    WorldDisconnected {
        /// Last known state of the world, if any.
        world: Option<World>,
    },
    /// The universe server dropped the connection.
    UniverseDisconnected {
        /// Why the link went away.
        reason: DisconnectReason,
    },
    /// This client was teleported.
    Teleported {
        /// The teleport payload.
        teleport: Teleport,
    },
    /// A user-attributes query answered.
    UserAttributesReceived {
        /// The decoded attributes.
        attributes: UserAttributes,
    },
    /// Another user asked to join this client.
    JoinRequested {
        /// The join request.
        request: JoinRequest,
    },
    /// A friend was added.
    FriendAdded {
        /// The new friend entry, as far as the callback carried it.
        friend: Friend,
    },
    /// A friend was deleted.
    FriendDeleted {
        /// Id of the removed entry.
        friend_id: i32,
    },
    /// One streamed friend-list entry.
    FriendListed {
        /// The decoded entry.
        friend: Friend,
    },
}

/// Subscription key: which family of [`SessionEvent`] to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`SessionEvent::Chat`]
    Chat,
    /// [`SessionEvent::AvatarEntered`]
    AvatarEntered,
    /// [`SessionEvent::AvatarChanged`]
    AvatarChanged,
    /// [`SessionEvent::AvatarLeft`]
    AvatarLeft,
    /// [`SessionEvent::AvatarClicked`]
    AvatarClicked,
    /// [`SessionEvent::ObjectCreated`]
    ObjectCreated,
    /// [`SessionEvent::ObjectChanged`]
    ObjectChanged,
    /// [`SessionEvent::ObjectDeleted`]
    ObjectDeleted,
    /// [`SessionEvent::ObjectClicked`]
    ObjectClicked,
    /// [`SessionEvent::ObjectBumped`]
    ObjectBumped,
    /// [`SessionEvent::CellObject`]
    CellObject,
    /// [`SessionEvent::CellEnd`]
    CellEnd,
    /// [`SessionEvent::WorldListed`]
    WorldListed,
    /// [`SessionEvent::WorldSettingsChanged`]
    WorldSettingsChanged,
    /// [`SessionEvent::WorldEntered`]
    WorldEntered,
    /// [`SessionEvent::WorldLeft`]
    WorldLeft,
    /// [`SessionEvent::WorldDisconnected`]
    WorldDisconnected,
    /// [`SessionEvent::UniverseDisconnected`]
    UniverseDisconnected,
    /// [`SessionEvent::Teleported`]
    Teleported,
    /// [`SessionEvent::UserAttributesReceived`]
    UserAttributesReceived,
    /// [`SessionEvent::JoinRequested`]
    JoinRequested,
    /// [`SessionEvent::FriendAdded`]
    FriendAdded,
    /// [`SessionEvent::FriendDeleted`]
    FriendDeleted,
    /// [`SessionEvent::FriendListed`]
    FriendListed,
}

impl SessionEvent {
    /// The subscription key this event is delivered under.
    pub fn kind(&self) -> EventKind {
        match self {
            SessionEvent::Chat { .. } => EventKind::Chat,
            SessionEvent::AvatarEntered { .. } => EventKind::AvatarEntered,
            SessionEvent::AvatarChanged { .. } => EventKind::AvatarChanged,
            SessionEvent::AvatarLeft { .. } => EventKind::AvatarLeft,
            SessionEvent::AvatarClicked { .. } => EventKind::AvatarClicked,
            SessionEvent::ObjectCreated { .. } => EventKind::ObjectCreated,
            SessionEvent::ObjectChanged { .. } => EventKind::ObjectChanged,
            SessionEvent::ObjectDeleted { .. } => EventKind::ObjectDeleted,
            SessionEvent::ObjectClicked { .. } => EventKind::ObjectClicked,
            SessionEvent::ObjectBumped { .. } => EventKind::ObjectBumped,
            SessionEvent::CellObject { .. } => EventKind::CellObject,
            SessionEvent::CellEnd { .. } => EventKind::CellEnd,
            SessionEvent::WorldListed { .. } => EventKind::WorldListed,
            SessionEvent::WorldSettingsChanged { .. } => EventKind::WorldSettingsChanged,
            SessionEvent::WorldEntered { .. } => EventKind::WorldEntered,
            SessionEvent::WorldLeft { .. } => EventKind::WorldLeft,
            SessionEvent::WorldDisconnected { .. } => EventKind::WorldDisconnected,
            SessionEvent::UniverseDisconnected { .. } => EventKind::UniverseDisconnected,
            SessionEvent::Teleported { .. } => EventKind::Teleported,
            SessionEvent::UserAttributesReceived { .. } => EventKind::UserAttributesReceived,
            SessionEvent::JoinRequested { .. } => EventKind::JoinRequested,
            SessionEvent::FriendAdded { .. } => EventKind::FriendAdded,
            SessionEvent::FriendDeleted { .. } => EventKind::FriendDeleted,
            SessionEvent::FriendListed { .. } => EventKind::FriendListed,
        }
    }
}
