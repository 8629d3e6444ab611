//! Typed attribute names for the native register interface.
//!
//! The native transport stages outbound fields and exposes inbound callback
//! fields through per-type attribute registers. Each enum below names the
//! registers of one type; a transport implementation maps them onto its own
//! wire identifiers.

use thiserror::Error;

/// Integer-valued attribute registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntAttribute {
    /// Session id of the avatar a callback refers to.
    AvatarSession,
    /// Avatar (model) type number.
    AvatarType,
    /// User account id behind an avatar.
    UserId,
    /// Own avatar type.
    MyType,
    /// Own user account id.
    MyUserId,
    /// Unix timestamp of the user's last login.
    UserLastLogin,
    /// Accumulated online time of a user, in seconds.
    UserOnlineTime,
    /// Unix timestamp of the user's registration.
    UserRegistrationTime,
    /// Chat message category.
    ChatType,
    /// Chat text-effect bitmask.
    ChatEffects,
    /// Console-message color, red channel.
    ChatColorRed,
    /// Console-message color, green channel.
    ChatColorGreen,
    /// Console-message color, blue channel.
    ChatColorBlue,
    /// Session id of the avatar that was clicked.
    ClickedSession,
    /// Object id.
    ObjectId,
    /// Object type number.
    ObjectType,
    /// User id of the object owner.
    ObjectUserId,
    /// Unix timestamp of the object's last build change.
    ObjectTime,
    /// Correlation id echoed back by solicited callbacks.
    ReferenceNumber,
    /// Lifecycle state of a listed world.
    WorldState,
    /// Current user count of a listed world.
    WorldUsers,
    /// Cell x coordinate of a query result.
    CellX,
    /// Cell z coordinate of a query result.
    CellZ,
    /// Friend list entry id.
    FriendId,
    /// User id behind a friend entry.
    FriendUserId,
    /// Whether a friend entry is currently online (0/1).
    FriendOnline,
    /// Join request id.
    JoinId,
    /// Reason carried by a disconnect notification.
    DisconnectReason,
}

/// Floating-point attribute registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatAttribute {
    /// Avatar position, x component.
    AvatarX,
    /// Avatar position, y component.
    AvatarY,
    /// Avatar position, z component.
    AvatarZ,
    /// Avatar yaw, in degrees.
    AvatarYaw,
    /// Avatar pitch, in degrees.
    AvatarPitch,
    /// Own position, x component.
    MyX,
    /// Own position, y component.
    MyY,
    /// Own position, z component.
    MyZ,
    /// Own yaw, in degrees.
    MyYaw,
    /// Own pitch, in degrees.
    MyPitch,
    /// Object position, x component.
    ObjectX,
    /// Object position, y component.
    ObjectY,
    /// Object position, z component.
    ObjectZ,
    /// Object rotation axis, x component.
    ObjectRotationX,
    /// Object rotation axis, y component.
    ObjectRotationY,
    /// Object rotation axis, z component.
    ObjectRotationZ,
    /// Object rotation angle around the axis.
    ObjectRotationAngle,
    /// Teleport target position, x component.
    TeleportX,
    /// Teleport target position, y component.
    TeleportY,
    /// Teleport target position, z component.
    TeleportZ,
    /// Teleport target yaw.
    TeleportYaw,
    /// Teleport target pitch.
    TeleportPitch,
    /// Click hit point, x component.
    ClickHitX,
    /// Click hit point, y component.
    ClickHitY,
    /// Click hit point, z component.
    ClickHitZ,
}

/// String-valued attribute registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringAttribute {
    /// Display name of an avatar.
    AvatarName,
    /// Chat message text.
    ChatMessage,
    /// Account name of a user.
    UserName,
    /// Email address of a user.
    UserEmail,
    /// Name of a listed world.
    WorldName,
    /// Key of a streamed world setting.
    WorldSettingKey,
    /// Value of a streamed world setting.
    WorldSettingValue,
    /// World named in a teleport request.
    TeleportWorld,
    /// Object action script.
    ObjectAction,
    /// Object description text.
    ObjectDescription,
    /// Object model name.
    ObjectModel,
    /// Display name of a friend entry.
    FriendName,
    /// Display name carried by a join request.
    JoinName,
}

/// Opaque byte-sequence attribute registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataAttribute {
    /// Free-form object payload bytes.
    ObjectData,
}

/// Failure to read an attribute from a callback handle.
///
/// The session layer treats these as decode failures: the specific callback
/// is dropped and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// The integer register is not populated on this handle.
    #[error("integer attribute {0:?} not present on this handle")]
    MissingInt(IntAttribute),
    /// The float register is not populated on this handle.
    #[error("float attribute {0:?} not present on this handle")]
    MissingFloat(FloatAttribute),
    /// The string register is not populated on this handle.
    #[error("string attribute {0:?} not present on this handle")]
    MissingString(StringAttribute),
    /// The data register is not populated on this handle.
    #[error("data attribute {0:?} not present on this handle")]
    MissingData(DataAttribute),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_error_display() {
        let err = AttributeError::MissingInt(IntAttribute::AvatarSession);
        assert!(err.to_string().contains("AvatarSession"));

        let err = AttributeError::MissingString(StringAttribute::WorldName);
        assert!(err.to_string().contains("WorldName"));
    }
}
