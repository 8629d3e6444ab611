//! The narrow seam to the external native transport.
//!
//! The transport owns the wire protocol: field encoding, the socket, and
//! the thread its callbacks arrive on. This layer consumes it through two
//! traits. [`AttributeReader`] is the opaque per-callback handle the
//! dispatcher decodes payloads from; [`Transport`] is the outbound surface
//! of staged attribute registers and send primitives, each returning a
//! synchronous raw reason code (zero = accepted).
//!
//! Inbound wiring is the inverse: whoever glues a transport to a
//! [`Session`](crate::Session) forwards each native notification to
//! [`Session::handle_event`](crate::Session::handle_event) or
//! [`Session::handle_callback`](crate::Session::handle_callback), one call
//! per native slot.

use worldgate_proto::{
    AttributeError, DataAttribute, FloatAttribute, IntAttribute, StringAttribute,
};

/// Typed accessors over one callback's payload.
///
/// Handles are only valid for the duration of the dispatcher call they are
/// passed to; the dispatcher copies everything it needs before returning.
pub trait AttributeReader {
    /// Read an integer register.
    fn int(&self, attr: IntAttribute) -> Result<i32, AttributeError>;
    /// Read a float register.
    fn float(&self, attr: FloatAttribute) -> Result<f64, AttributeError>;
    /// Read a string register.
    fn string(&self, attr: StringAttribute) -> Result<String, AttributeError>;
    /// Read a byte-sequence register.
    fn data(&self, attr: DataAttribute) -> Result<Vec<u8>, AttributeError>;
}

/// Outbound primitives of the native transport.
///
/// Multi-field requests (object operations, avatar state) are staged into
/// the typed attribute registers with the `set_*` methods, then sent with
/// the matching primitive; the session layer holds its own lock across
/// stage+send so concurrent operations cannot interleave registers.
pub trait Transport: Send + Sync {
    // ------------------------------------------------------------------
    // Staged attribute registers
    // ------------------------------------------------------------------

    /// Stage an integer register for the next send.
    fn set_int(&self, attr: IntAttribute, value: i32);
    /// Stage a float register for the next send.
    fn set_float(&self, attr: FloatAttribute, value: f64);
    /// Stage a string register for the next send.
    fn set_string(&self, attr: StringAttribute, value: &str);
    /// Stage a byte-sequence register for the next send.
    fn set_data(&self, attr: DataAttribute, value: &[u8]);

    /// Read back an instance-level integer register (own avatar state).
    fn get_int(&self, attr: IntAttribute) -> Result<i32, AttributeError>;
    /// Read back an instance-level float register (own avatar state).
    fn get_float(&self, attr: FloatAttribute) -> Result<f64, AttributeError>;

    // ------------------------------------------------------------------
    // Bootstrap
    // ------------------------------------------------------------------

    /// Open the universe connection.
    fn connect_universe(&self, host: &str, port: u16) -> i32;
    /// Authenticate against the universe.
    fn login(&self, username: &str, password: &str, bot_name: &str) -> i32;
    /// Enter the named world.
    fn enter(&self, world: &str) -> i32;
    /// Leave the current world.
    fn leave(&self) -> i32;
    /// Tear down the universe connection.
    fn disconnect(&self) -> i32;

    // ------------------------------------------------------------------
    // World and universe queries
    // ------------------------------------------------------------------

    /// Request the universe world list; entries arrive as events.
    fn list_worlds(&self) -> i32;
    /// Query a cell's objects; results arrive as events.
    fn query_cell(&self, cell_x: i32, cell_z: i32, revision: i32) -> i32;
    /// Query a terrain tile; results arrive as events.
    fn terrain_query(&self, tile_x: i32, tile_z: i32, revision: i32) -> i32;
    /// Query a user's attributes by user id; the answer arrives as an event.
    fn user_attributes_by_id(&self, user_id: i32) -> i32;

    // ------------------------------------------------------------------
    // Avatar state and chat
    // ------------------------------------------------------------------

    /// Announce the own avatar state staged in the `My*` registers.
    fn state_change(&self) -> i32;
    /// Say a chat line in the current world.
    fn say(&self, message: &str) -> i32;
    /// Send a styled console message (session 0 = broadcast).
    #[allow(clippy::too_many_arguments)]
    fn console_message(
        &self,
        to_session: i32,
        from_name: &str,
        text: &str,
        effects: i32,
        red: u8,
        green: u8,
        blue: u8,
    ) -> i32;
    /// Push a URL to another session (target: 0 = browser, 1 = overlay).
    fn url_send(&self, to_session: i32, url: &str, target: i32) -> i32;
    /// Click an avatar.
    fn avatar_click(&self, session: i32) -> i32;
    /// Teleport an avatar (empty world name = within the current world).
    #[allow(clippy::too_many_arguments)]
    fn teleport_avatar(
        &self,
        target_session: i32,
        world: &str,
        x: f64,
        y: f64,
        z: f64,
        yaw: f64,
        pitch: f64,
    ) -> i32;

    // ------------------------------------------------------------------
    // Objects (request fields staged in the Object* registers)
    // ------------------------------------------------------------------

    /// Send a staged object add; the callback carries the new object id.
    fn object_add(&self) -> i32;
    /// Send a staged object change.
    fn object_change(&self) -> i32;
    /// Delete an object by id.
    fn object_delete(&self, object_id: i32) -> i32;
    /// Request a full object by id; the callback carries the object.
    fn object_get(&self, object_id: i32) -> i32;
    /// Send a staged object load (build-import with owner and timestamp).
    fn object_load(&self) -> i32;
    /// Click an object, optionally addressed to one session.
    fn object_click(&self, object_id: i32, to_session: i32, hit_x: f64, hit_y: f64, hit_z: f64)
        -> i32;

    // ------------------------------------------------------------------
    // Friends and joins
    // ------------------------------------------------------------------

    /// Request the friend list; entries stream back as callbacks.
    fn friends_get(&self) -> i32;
    /// Add a friend by name.
    fn friend_add_by_name(&self, name: &str) -> i32;
    /// Delete a friend by entry id.
    fn friend_delete(&self, friend_id: i32) -> i32;
    /// Ask to join another user.
    fn join_user(&self, user_id: i32) -> i32;
    /// Accept a pending join request.
    #[allow(clippy::too_many_arguments)]
    fn join_accept(
        &self,
        request_id: i32,
        world: &str,
        x: f64,
        y: f64,
        z: f64,
        yaw: f64,
        pitch: f64,
    ) -> i32;
    /// Decline a pending join request.
    fn join_decline(&self, request_id: i32) -> i32;

    // ------------------------------------------------------------------
    // World administration
    // ------------------------------------------------------------------

    /// Grant or revoke a world permission for a user id.
    fn world_permission_user_set(&self, permission: &str, user_id: i32, enable: bool) -> i32;
    /// Grant or revoke a world permission for a session.
    fn world_permission_session_set(&self, permission: &str, session: i32, enable: bool) -> i32;
    /// Set a world setting, optionally addressed to one session.
    fn world_setting_set(&self, setting: &str, value: &str, to_session: i32) -> i32;
}
