//! A scriptable in-memory transport.
//!
//! Records every outbound call, keeps the staged attribute registers
//! inspectable, and lets tests force a synchronous reason code per
//! primitive.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use worldgate::proto::{
    AttributeError, DataAttribute, FloatAttribute, IntAttribute, StringAttribute,
};
use worldgate::Transport;

#[derive(Default)]
pub struct FakeTransport {
    calls: Mutex<Vec<String>>,
    forced: Mutex<HashMap<&'static str, i32>>,
    ints: Mutex<HashMap<IntAttribute, i32>>,
    floats: Mutex<HashMap<FloatAttribute, f64>>,
    strings: Mutex<HashMap<StringAttribute, String>>,
    data: Mutex<HashMap<DataAttribute, Vec<u8>>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Force the named primitive to return `rc` synchronously.
    pub fn force(&self, op: &'static str, rc: i32) {
        self.forced.lock().unwrap().insert(op, rc);
    }

    /// Every primitive invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether any recorded call starts with `prefix`.
    pub fn called(&self, prefix: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|call| call.starts_with(prefix))
    }

    /// The currently staged value of an integer register.
    pub fn staged_int(&self, attr: IntAttribute) -> Option<i32> {
        self.ints.lock().unwrap().get(&attr).copied()
    }

    /// The currently staged value of a string register.
    pub fn staged_string(&self, attr: StringAttribute) -> Option<String> {
        self.strings.lock().unwrap().get(&attr).cloned()
    }

    /// The correlation id staged for the most recent solicited send.
    pub fn last_reference(&self) -> i32 {
        self.staged_int(IntAttribute::ReferenceNumber)
            .expect("no solicited operation was started")
    }

    fn op(&self, name: &'static str, call: String) -> i32 {
        self.calls.lock().unwrap().push(call);
        self.forced.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

impl Transport for FakeTransport {
    fn set_int(&self, attr: IntAttribute, value: i32) {
        self.ints.lock().unwrap().insert(attr, value);
    }

    fn set_float(&self, attr: FloatAttribute, value: f64) {
        self.floats.lock().unwrap().insert(attr, value);
    }

    fn set_string(&self, attr: StringAttribute, value: &str) {
        self.strings.lock().unwrap().insert(attr, value.to_string());
    }

    fn set_data(&self, attr: DataAttribute, value: &[u8]) {
        self.data.lock().unwrap().insert(attr, value.to_vec());
    }

    fn get_int(&self, attr: IntAttribute) -> Result<i32, AttributeError> {
        self.ints
            .lock()
            .unwrap()
            .get(&attr)
            .copied()
            .ok_or(AttributeError::MissingInt(attr))
    }

    fn get_float(&self, attr: FloatAttribute) -> Result<f64, AttributeError> {
        self.floats
            .lock()
            .unwrap()
            .get(&attr)
            .copied()
            .ok_or(AttributeError::MissingFloat(attr))
    }

    fn connect_universe(&self, host: &str, port: u16) -> i32 {
        self.op("connect_universe", format!("connect_universe({host}:{port})"))
    }

    fn login(&self, username: &str, _password: &str, bot_name: &str) -> i32 {
        self.op("login", format!("login({username}, {bot_name})"))
    }

    fn enter(&self, world: &str) -> i32 {
        self.op("enter", format!("enter({world})"))
    }

    fn leave(&self) -> i32 {
        self.op("leave", "leave".to_string())
    }

    fn disconnect(&self) -> i32 {
        self.op("disconnect", "disconnect".to_string())
    }

    fn list_worlds(&self) -> i32 {
        self.op("list_worlds", "list_worlds".to_string())
    }

    fn query_cell(&self, cell_x: i32, cell_z: i32, revision: i32) -> i32 {
        self.op("query_cell", format!("query_cell({cell_x}, {cell_z}, {revision})"))
    }

    fn terrain_query(&self, tile_x: i32, tile_z: i32, revision: i32) -> i32 {
        self.op(
            "terrain_query",
            format!("terrain_query({tile_x}, {tile_z}, {revision})"),
        )
    }

    fn user_attributes_by_id(&self, user_id: i32) -> i32 {
        self.op(
            "user_attributes_by_id",
            format!("user_attributes_by_id({user_id})"),
        )
    }

    fn state_change(&self) -> i32 {
        self.op("state_change", "state_change".to_string())
    }

    fn say(&self, message: &str) -> i32 {
        self.op("say", format!("say({message})"))
    }

    fn console_message(
        &self,
        to_session: i32,
        _from_name: &str,
        text: &str,
        _effects: i32,
        _red: u8,
        _green: u8,
        _blue: u8,
    ) -> i32 {
        self.op(
            "console_message",
            format!("console_message({to_session}, {text})"),
        )
    }

    fn url_send(&self, to_session: i32, url: &str, target: i32) -> i32 {
        self.op("url_send", format!("url_send({to_session}, {url}, {target})"))
    }

    fn avatar_click(&self, session: i32) -> i32 {
        self.op("avatar_click", format!("avatar_click({session})"))
    }

    fn teleport_avatar(
        &self,
        target_session: i32,
        world: &str,
        _x: f64,
        _y: f64,
        _z: f64,
        _yaw: f64,
        _pitch: f64,
    ) -> i32 {
        self.op(
            "teleport_avatar",
            format!("teleport_avatar({target_session}, {world})"),
        )
    }

    fn object_add(&self) -> i32 {
        self.op("object_add", "object_add".to_string())
    }

    fn object_change(&self) -> i32 {
        self.op("object_change", "object_change".to_string())
    }

    fn object_delete(&self, object_id: i32) -> i32 {
        self.op("object_delete", format!("object_delete({object_id})"))
    }

    fn object_get(&self, object_id: i32) -> i32 {
        self.op("object_get", format!("object_get({object_id})"))
    }

    fn object_load(&self) -> i32 {
        self.op("object_load", "object_load".to_string())
    }

    fn object_click(
        &self,
        object_id: i32,
        to_session: i32,
        _hit_x: f64,
        _hit_y: f64,
        _hit_z: f64,
    ) -> i32 {
        self.op(
            "object_click",
            format!("object_click({object_id}, {to_session})"),
        )
    }

    fn friends_get(&self) -> i32 {
        self.op("friends_get", "friends_get".to_string())
    }

    fn friend_add_by_name(&self, name: &str) -> i32 {
        self.op("friend_add_by_name", format!("friend_add_by_name({name})"))
    }

    fn friend_delete(&self, friend_id: i32) -> i32 {
        self.op("friend_delete", format!("friend_delete({friend_id})"))
    }

    fn join_user(&self, user_id: i32) -> i32 {
        self.op("join_user", format!("join_user({user_id})"))
    }

    fn join_accept(
        &self,
        request_id: i32,
        world: &str,
        _x: f64,
        _y: f64,
        _z: f64,
        _yaw: f64,
        _pitch: f64,
    ) -> i32 {
        self.op("join_accept", format!("join_accept({request_id}, {world})"))
    }

    fn join_decline(&self, request_id: i32) -> i32 {
        self.op("join_decline", format!("join_decline({request_id})"))
    }

    fn world_permission_user_set(&self, permission: &str, user_id: i32, enable: bool) -> i32 {
        self.op(
            "world_permission_user_set",
            format!("world_permission_user_set({permission}, {user_id}, {enable})"),
        )
    }

    fn world_permission_session_set(&self, permission: &str, session: i32, enable: bool) -> i32 {
        self.op(
            "world_permission_session_set",
            format!("world_permission_session_set({permission}, {session}, {enable})"),
        )
    }

    fn world_setting_set(&self, setting: &str, value: &str, to_session: i32) -> i32 {
        self.op(
            "world_setting_set",
            format!("world_setting_set({setting}, {value}, {to_session})"),
        )
    }
}
