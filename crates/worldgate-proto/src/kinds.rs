//! Native notification slots.
//!
//! The transport delivers two families of notifications: unsolicited
//! [`Event`]s describing state the server pushed, and solicited
//! [`Callback`]s echoing a reason code (and, where applicable, a
//! correlation id) for a request this client sent earlier. The native API
//! has one registration slot per member of each family.

/// Unsolicited event slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// A chat line arrived.
    Chat,
    /// An avatar entered the world.
    AvatarAdd,
    /// An avatar moved or turned.
    AvatarChange,
    /// An avatar left the world.
    AvatarDelete,
    /// An avatar was clicked.
    AvatarClick,
    /// One entry of a universe world list.
    WorldList,
    /// One key/value pair of the world settings stream.
    WorldSetting,
    /// The world settings stream completed.
    WorldSettingsChanged,
    /// The world server dropped the connection.
    WorldDisconnect,
    /// An object appeared (build or cell-query result).
    ObjectCreate,
    /// An object was modified.
    ObjectChange,
    /// An object was deleted.
    ObjectDelete,
    /// An object was clicked.
    ObjectClick,
    /// An avatar started bumping into an object.
    ObjectBumpBegin,
    /// An avatar stopped bumping into an object.
    ObjectBumpEnd,
    /// A cell query finished streaming.
    QueryCellEnd,
    /// The universe server dropped the connection.
    UniverseDisconnect,
    /// This client was teleported.
    Teleport,
    /// A user-attributes query answered.
    UserAttributes,
    /// Another user asked to join this client.
    Join,
}

/// Solicited callback slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Callback {
    /// Result of an object add.
    ObjectAdd,
    /// Result of an object change.
    ObjectChange,
    /// Result of an object delete.
    ObjectDelete,
    /// Result of an object get, carrying the decoded object.
    ObjectGet,
    /// Result of an object load.
    ObjectLoad,
    /// Result of a friend add.
    FriendAdd,
    /// Result of a friend delete.
    FriendDelete,
    /// One streamed entry of a friend list.
    GetFriends,
    /// Result of an authentication attempt.
    Login,
    /// Result of a world enter.
    Enter,
    /// Result of a universe connect.
    ConnectUniverse,
    /// Result of a join request.
    Join,
    /// Result of setting a per-user world permission.
    WorldPermissionUserSet,
    /// Result of setting a per-session world permission.
    WorldPermissionSessionSet,
    /// Result of setting a world setting.
    WorldSettingSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slots_are_hashable_and_distinct() {
        let events: HashSet<Event> = [Event::Chat, Event::AvatarAdd, Event::AvatarChange]
            .into_iter()
            .collect();
        assert_eq!(events.len(), 3);

        let callbacks: HashSet<Callback> = [Callback::Login, Callback::Enter]
            .into_iter()
            .collect();
        assert_eq!(callbacks.len(), 2);
    }
}
