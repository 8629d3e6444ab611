//! The numeric reason-code domain returned by the native transport.
//!
//! Zero means success; every nonzero code identifies a specific
//! protocol-level failure. The session layer maps these 1:1 onto its error
//! taxonomy.

use thiserror::Error;

/// Symbolic meaning of a native reason code.
///
/// Codes the transport may emit that this crate does not know about are
/// preserved as [`ReasonCode::Unknown`] rather than dropped, so diagnostics
/// keep the raw number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReasonCode {
    /// The operation completed.
    #[error("success")]
    Success,
    /// Client and server protocol versions do not match.
    #[error("protocol version mismatch")]
    VersionMismatch,
    /// A string field exceeded the protocol limit.
    #[error("string too long")]
    StringTooLong,
    /// Credentials were rejected.
    #[error("invalid login")]
    InvalidLogin,
    /// The named world is not known to the universe.
    #[error("world not found")]
    WorldNotFound,
    /// The world server rejected the login.
    #[error("world login error")]
    WorldLoginError,
    /// The operation requires an entered world.
    #[error("not in a world")]
    NotInWorld,
    /// The underlying connection failed.
    #[error("connection error")]
    ConnectionError,
    /// No native instance is available.
    #[error("no instance")]
    NoInstance,
    /// The transport does not implement the operation.
    #[error("not implemented")]
    NotImplemented,
    /// A named attribute does not exist.
    #[error("no such attribute")]
    NoSuchAttribute,
    /// The server refused the operation.
    #[error("not allowed")]
    NotAllowed,
    /// Server-side persistence failed.
    #[error("database error")]
    DatabaseError,
    /// The named user does not exist.
    #[error("no such user")]
    NoSuchUser,
    /// The operation timed out inside the transport.
    #[error("timeout")]
    Timeout,
    /// The operation requires a universe connection.
    #[error("not in universe")]
    NotInUniverse,
    /// An argument was rejected by the transport.
    #[error("invalid arguments")]
    InvalidArguments,
    /// The referenced object does not exist.
    #[error("object not found")]
    ObjectNotFound,
    /// The remote peer declined the join request.
    #[error("join declined")]
    JoinDeclined,
    /// The universe requires a secure connection.
    #[error("secure connection required")]
    SecureConnectionRequired,
    /// The remote peer declined the bump.
    #[error("bump declined")]
    BumpDeclined,
    /// Coordinates were outside the permitted range.
    #[error("invalid coordinates")]
    InvalidCoordinates,
    /// A code this crate has no symbolic name for.
    #[error("unknown reason code {0}")]
    Unknown(i32),
}

impl ReasonCode {
    /// Whether this code denotes success.
    pub fn is_success(self) -> bool {
        self == ReasonCode::Success
    }

    /// The raw numeric value of this code.
    pub fn as_i32(self) -> i32 {
        match self {
            ReasonCode::Success => 0,
            ReasonCode::VersionMismatch => 1,
            ReasonCode::StringTooLong => 2,
            ReasonCode::InvalidLogin => 3,
            ReasonCode::WorldNotFound => 4,
            ReasonCode::WorldLoginError => 5,
            ReasonCode::NotInWorld => 6,
            ReasonCode::ConnectionError => 7,
            ReasonCode::NoInstance => 8,
            ReasonCode::NotImplemented => 9,
            ReasonCode::NoSuchAttribute => 10,
            ReasonCode::NotAllowed => 11,
            ReasonCode::DatabaseError => 12,
            ReasonCode::NoSuchUser => 13,
            ReasonCode::Timeout => 14,
            ReasonCode::NotInUniverse => 15,
            ReasonCode::InvalidArguments => 16,
            ReasonCode::ObjectNotFound => 17,
            ReasonCode::JoinDeclined => 20,
            ReasonCode::SecureConnectionRequired => 21,
            ReasonCode::BumpDeclined => 29,
            ReasonCode::InvalidCoordinates => 30,
            ReasonCode::Unknown(raw) => raw,
        }
    }
}

impl From<i32> for ReasonCode {
    fn from(raw: i32) -> Self {
        match raw {
            0 => ReasonCode::Success,
            1 => ReasonCode::VersionMismatch,
            2 => ReasonCode::StringTooLong,
            3 => ReasonCode::InvalidLogin,
            4 => ReasonCode::WorldNotFound,
            5 => ReasonCode::WorldLoginError,
            6 => ReasonCode::NotInWorld,
            7 => ReasonCode::ConnectionError,
            8 => ReasonCode::NoInstance,
            9 => ReasonCode::NotImplemented,
            10 => ReasonCode::NoSuchAttribute,
            11 => ReasonCode::NotAllowed,
            12 => ReasonCode::DatabaseError,
            13 => ReasonCode::NoSuchUser,
            14 => ReasonCode::Timeout,
            15 => ReasonCode::NotInUniverse,
            16 => ReasonCode::InvalidArguments,
            17 => ReasonCode::ObjectNotFound,
            20 => ReasonCode::JoinDeclined,
            21 => ReasonCode::SecureConnectionRequired,
            29 => ReasonCode::BumpDeclined,
            30 => ReasonCode::InvalidCoordinates,
            other => ReasonCode::Unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_known_codes() {
        for raw in [0, 1, 3, 4, 7, 14, 17, 20, 29, 30] {
            let code = ReasonCode::from(raw);
            assert!(!matches!(code, ReasonCode::Unknown(_)), "raw {raw}");
            assert_eq!(code.as_i32(), raw);
        }
    }

    #[test]
    fn test_unknown_codes_preserve_raw_value() {
        let code = ReasonCode::from(999);
        assert_eq!(code, ReasonCode::Unknown(999));
        assert_eq!(code.as_i32(), 999);
        assert!(code.to_string().contains("999"));
    }

    #[test]
    fn test_success_predicate() {
        assert!(ReasonCode::from(0).is_success());
        assert!(!ReasonCode::from(3).is_success());
    }
}
