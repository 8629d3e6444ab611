//! Scripted callback handles.

use std::collections::HashMap;
use worldgate::proto::{
    AttributeError, DataAttribute, FloatAttribute, IntAttribute, StringAttribute,
};
use worldgate::AttributeReader;

/// An [`AttributeReader`] backed by explicit register maps. Reads of
/// unpopulated registers fail like a real handle would.
#[derive(Debug, Clone, Default)]
pub struct FakeHandle {
    ints: HashMap<IntAttribute, i32>,
    floats: HashMap<FloatAttribute, f64>,
    strings: HashMap<StringAttribute, String>,
    data: HashMap<DataAttribute, Vec<u8>>,
}

impl FakeHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_int(mut self, attr: IntAttribute, value: i32) -> Self {
        self.ints.insert(attr, value);
        self
    }

    pub fn with_float(mut self, attr: FloatAttribute, value: f64) -> Self {
        self.floats.insert(attr, value);
        self
    }

    pub fn with_string(mut self, attr: StringAttribute, value: &str) -> Self {
        self.strings.insert(attr, value.to_string());
        self
    }

    pub fn with_data(mut self, attr: DataAttribute, value: &[u8]) -> Self {
        self.data.insert(attr, value.to_vec());
        self
    }
}

impl AttributeReader for FakeHandle {
    fn int(&self, attr: IntAttribute) -> Result<i32, AttributeError> {
        self.ints
            .get(&attr)
            .copied()
            .ok_or(AttributeError::MissingInt(attr))
    }

    fn float(&self, attr: FloatAttribute) -> Result<f64, AttributeError> {
        self.floats
            .get(&attr)
            .copied()
            .ok_or(AttributeError::MissingFloat(attr))
    }

    fn string(&self, attr: StringAttribute) -> Result<String, AttributeError> {
        self.strings
            .get(&attr)
            .cloned()
            .ok_or(AttributeError::MissingString(attr))
    }

    fn data(&self, attr: DataAttribute) -> Result<Vec<u8>, AttributeError> {
        self.data
            .get(&attr)
            .cloned()
            .ok_or(AttributeError::MissingData(attr))
    }
}

/// Handle for an avatar-add event.
pub fn avatar_add_handle(
    session: i32,
    user_id: i32,
    name: &str,
    pos: (f64, f64, f64),
    rot: (f64, f64),
) -> FakeHandle {
    FakeHandle::new()
        .with_int(IntAttribute::AvatarSession, session)
        .with_int(IntAttribute::UserId, user_id)
        .with_int(IntAttribute::AvatarType, 1)
        .with_string(StringAttribute::AvatarName, name)
        .with_float(FloatAttribute::AvatarX, pos.0)
        .with_float(FloatAttribute::AvatarY, pos.1)
        .with_float(FloatAttribute::AvatarZ, pos.2)
        .with_float(FloatAttribute::AvatarPitch, rot.0)
        .with_float(FloatAttribute::AvatarYaw, rot.1)
}

/// Handle for an avatar-change event (no user id on the wire).
pub fn avatar_change_handle(
    session: i32,
    name: &str,
    pos: (f64, f64, f64),
    rot: (f64, f64),
) -> FakeHandle {
    FakeHandle::new()
        .with_int(IntAttribute::AvatarSession, session)
        .with_int(IntAttribute::AvatarType, 1)
        .with_string(StringAttribute::AvatarName, name)
        .with_float(FloatAttribute::AvatarX, pos.0)
        .with_float(FloatAttribute::AvatarY, pos.1)
        .with_float(FloatAttribute::AvatarZ, pos.2)
        .with_float(FloatAttribute::AvatarPitch, rot.0)
        .with_float(FloatAttribute::AvatarYaw, rot.1)
}

/// Handle for an avatar-delete event.
pub fn avatar_delete_handle(session: i32) -> FakeHandle {
    FakeHandle::new().with_int(IntAttribute::AvatarSession, session)
}

/// Handle carrying a full object payload.
pub fn object_handle(object_id: i32, session: i32, model: &str) -> FakeHandle {
    FakeHandle::new()
        .with_int(IntAttribute::AvatarSession, session)
        .with_int(IntAttribute::ObjectId, object_id)
        .with_int(IntAttribute::ObjectType, 0)
        .with_int(IntAttribute::ObjectUserId, 42)
        .with_int(IntAttribute::ObjectTime, 1_700_000_000)
        .with_string(StringAttribute::ObjectModel, model)
        .with_string(StringAttribute::ObjectAction, "create sign")
        .with_string(StringAttribute::ObjectDescription, "a test object")
        .with_data(DataAttribute::ObjectData, b"\x01\x02")
        .with_float(FloatAttribute::ObjectX, 1.0)
        .with_float(FloatAttribute::ObjectY, 0.5)
        .with_float(FloatAttribute::ObjectZ, -3.0)
        .with_float(FloatAttribute::ObjectRotationX, 0.0)
        .with_float(FloatAttribute::ObjectRotationY, 1.0)
        .with_float(FloatAttribute::ObjectRotationZ, 0.0)
        .with_float(FloatAttribute::ObjectRotationAngle, 90.0)
}

/// Handle for one streamed friend-list entry.
pub fn friend_handle(id: i32, user_id: i32, name: &str, online: bool) -> FakeHandle {
    FakeHandle::new()
        .with_int(IntAttribute::FriendId, id)
        .with_int(IntAttribute::FriendUserId, user_id)
        .with_int(IntAttribute::FriendOnline, if online { 1 } else { 0 })
        .with_string(StringAttribute::FriendName, name)
}
