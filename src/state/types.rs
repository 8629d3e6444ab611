//! Payload types carried by events and operations.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;
use worldgate_proto::Vector3;

/// Application-defined extension fields on an entity.
///
/// Replaces the source protocol's swappable entity type parameters: code
/// that needs custom per-entity data composes it here instead of
/// substituting the whole type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions {
    fields: BTreeMap<String, String>,
}

impl Extensions {
    /// Look up an extension field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Set an extension field, returning the previous value if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    /// Remove an extension field.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    /// Whether any extension fields are set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over all extension fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Category of a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// Ordinary spoken chat.
    Normal,
    /// A styled console message.
    Console,
    /// A category this layer has no name for.
    Unknown(i32),
}

impl From<i32> for ChatKind {
    fn from(raw: i32) -> Self {
        match raw {
            0 => ChatKind::Normal,
            1 => ChatKind::Console,
            other => ChatKind::Unknown(other),
        }
    }
}

/// RGB color of a console message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// One received chat line.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Chat category.
    pub kind: ChatKind,
    /// Speaker name as carried on the wire.
    pub name: String,
    /// Message text.
    pub text: String,
    /// Console color; black for ordinary chat.
    pub color: Color,
    /// Text-effect bitmask.
    pub effects: i32,
}

/// A build object in the current world.
///
/// Objects are not cached by this layer; this is the payload shape for
/// object operations and events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldObject {
    /// Object id (zero until assigned by the server).
    pub id: i32,
    /// Object type number.
    pub object_type: i32,
    /// User id of the owner.
    pub owner: i32,
    /// Last build-change timestamp.
    pub time: Option<DateTime<Utc>>,
    /// Model name.
    pub model: String,
    /// Action script.
    pub action: String,
    /// Description text.
    pub description: String,
    /// Free-form payload bytes.
    pub data: Vec<u8>,
    /// Position in the world.
    pub position: Vector3,
    /// Rotation axis.
    pub rotation: Vector3,
    /// Rotation angle around the axis.
    pub angle: f64,
    /// Application-defined extension fields.
    pub extensions: Extensions,
}

/// One friend-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friend {
    /// Friend entry id.
    pub id: i32,
    /// User id behind the entry.
    pub user_id: i32,
    /// Display name.
    pub name: String,
    /// Whether the friend is currently online.
    pub online: bool,
}

/// Answer to a user-attributes query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAttributes {
    /// User id.
    pub id: i32,
    /// Account name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Last login time.
    pub last_login: Option<DateTime<Utc>>,
    /// Accumulated online time.
    pub online_time: Duration,
    /// Registration time.
    pub registration_date: Option<DateTime<Utc>>,
}

/// A teleport pushed to this client.
#[derive(Debug, Clone, PartialEq)]
pub struct Teleport {
    /// The avatar that initiated the teleport.
    pub avatar: super::Avatar,
    /// Target position.
    pub position: Vector3,
    /// Target rotation (pitch in x, yaw in y).
    pub rotation: Vector3,
    /// Target world name; empty means the current world.
    pub world: String,
}

/// Another user's request to join this client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    /// Request id, echoed in accept/decline.
    pub id: i32,
    /// Requesting user id.
    pub user_id: i32,
    /// Requesting user's display name.
    pub name: String,
}

/// A cell coordinate from a finished cell query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Cell x coordinate.
    pub x: i32,
    /// Cell z coordinate.
    pub z: i32,
}

/// Which side of a bump an object event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpPhase {
    /// Contact began.
    Begin,
    /// Contact ended.
    End,
}

/// Why the universe connection went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// This client asked for the disconnect.
    UserInitiated,
    /// The link dropped underneath us.
    ConnectionLost,
    /// A reason this layer has no name for.
    Unknown(i32),
}

impl From<i32> for DisconnectReason {
    fn from(raw: i32) -> Self {
        match raw {
            0 => DisconnectReason::ConnectionLost,
            1 => DisconnectReason::UserInitiated,
            other => DisconnectReason::Unknown(other),
        }
    }
}
