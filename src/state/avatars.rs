//! The avatar side of the entity cache.

use super::Extensions;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use worldgate_proto::Vector3;

/// An avatar currently (or last) known to the session.
///
/// Identity is the transport-scoped session id, which the server reuses
/// after a disconnect; it is never globally unique over time and never
/// changes for a live cache entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Avatar {
    /// Transport-scoped session id.
    pub session: i32,
    /// User account id behind the avatar.
    pub user_id: i32,
    /// Display name.
    pub name: String,
    /// Avatar (model) type number.
    pub avatar_type: i32,
    /// Position in the world.
    pub position: Vector3,
    /// Rotation: pitch in x, yaw in y; roll is unsupported and stays zero.
    pub rotation: Vector3,
    /// When this layer last accepted an update for the avatar.
    pub last_changed: Option<DateTime<Utc>>,
    /// Application-defined extension fields.
    pub extensions: Extensions,
}

impl Avatar {
    /// A placeholder carrying only the session id, used when nothing else
    /// is known yet (e.g. a click event referencing an unseen session).
    pub fn placeholder(session: i32) -> Self {
        Avatar {
            session,
            ..Avatar::default()
        }
    }

    /// Whether position and rotation match `other` in all six components.
    ///
    /// Exact equality, not epsilon: the source protocol suppresses change
    /// events on exact pose matches as a bandwidth heuristic, and that
    /// comparison is reproduced bit-for-bit.
    pub fn same_pose(&self, other: &Avatar) -> bool {
        self.position.x == other.position.x
            && self.position.y == other.position.y
            && self.position.z == other.position.z
            && self.rotation.x == other.rotation.x
            && self.rotation.y == other.rotation.y
            && self.rotation.z == other.rotation.z
    }
}

/// Authoritative session-id → avatar mapping.
///
/// Mutated only by the dispatcher and by placeholder-creating lookups; the
/// session mutex linearizes all access.
#[derive(Debug, Default)]
pub struct AvatarRegistry {
    avatars: HashMap<i32, Avatar>,
}

impl AvatarRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an avatar, creating a placeholder entry if the session is
    /// unknown. Returns a snapshot.
    pub fn get_or_create(&mut self, session: i32) -> Avatar {
        self.avatars
            .entry(session)
            .or_insert_with(|| Avatar::placeholder(session))
            .clone()
    }

    /// Look up an avatar without creating one.
    pub fn get(&self, session: i32) -> Option<&Avatar> {
        self.avatars.get(&session)
    }

    /// Insert or replace an avatar under its session id.
    pub fn upsert(&mut self, avatar: Avatar) {
        self.avatars.insert(avatar.session, avatar);
    }

    /// Insert an avatar only if its session is unseen. Returns whether the
    /// entry was inserted.
    pub fn insert_if_absent(&mut self, avatar: Avatar) -> bool {
        match self.avatars.entry(avatar.session) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(avatar);
                true
            }
        }
    }

    /// Apply a change-event update.
    ///
    /// Returns `Some((previous, current))` when the update was accepted,
    /// `None` when it was suppressed (identical pose — even if other
    /// fields, such as the name, differ) or when the session was unknown
    /// and the avatar was inserted fresh instead.
    pub fn apply_change(&mut self, mut incoming: Avatar, now: DateTime<Utc>) -> Option<(Avatar, Avatar)> {
        match self.avatars.get_mut(&incoming.session) {
            Some(existing) => {
                if incoming.same_pose(existing) {
                    return None;
                }
                // Change events do not carry the user id; keep the cached one.
                incoming.user_id = existing.user_id;
                incoming.last_changed = Some(now);
                incoming.extensions = existing.extensions.clone();
                let previous = std::mem::replace(existing, incoming);
                Some((previous, existing.clone()))
            }
            None => {
                incoming.last_changed = Some(now);
                self.avatars.insert(incoming.session, incoming);
                None
            }
        }
    }

    /// Remove an avatar, returning its last known state. Unknown sessions
    /// are a no-op.
    pub fn remove(&mut self, session: i32) -> Option<Avatar> {
        self.avatars.remove(&session)
    }

    /// Snapshot of all known avatars.
    pub fn list(&self) -> Vec<Avatar> {
        self.avatars.values().cloned().collect()
    }

    /// Number of known avatars.
    pub fn len(&self) -> usize {
        self.avatars.len()
    }

    /// Whether no avatars are known.
    pub fn is_empty(&self) -> bool {
        self.avatars.is_empty()
    }

    /// Drop every avatar (disconnect teardown).
    pub fn clear(&mut self) {
        self.avatars.clear();
    }
}
