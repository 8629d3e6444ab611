//! Fire-and-forget operations.
//!
//! These map 1:1 onto transport primitives that acknowledge with a
//! synchronous result code only; any response data arrives later as
//! unsolicited events. Each call takes the session lock so staged
//! registers cannot interleave with concurrent operations.

use super::Session;
use crate::error::{check_reason, SessionResult};
use crate::state::{Color, JoinRequest};
use worldgate_proto::Vector3;

/// Where a pushed URL opens on the receiving client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlTarget {
    /// The system browser.
    Browser,
    /// The in-world overlay.
    Overlay,
}

impl UrlTarget {
    fn as_i32(self) -> i32 {
        match self {
            UrlTarget::Browser => 0,
            UrlTarget::Overlay => 1,
        }
    }
}

impl Session {
    /// Say a chat line in the current world.
    pub fn say(&self, message: &str) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.say(message))
    }

    /// Send a styled console message. Session 0 broadcasts to the world.
    pub fn console_message(
        &self,
        to_session: i32,
        from_name: &str,
        text: &str,
        effects: i32,
        color: Color,
    ) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.console_message(
            to_session, from_name, text, effects, color.r, color.g, color.b,
        ))
    }

    /// Push a URL to another session.
    pub fn url_send(&self, to_session: i32, url: &str, target: UrlTarget) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.url_send(to_session, url, target.as_i32()))
    }

    /// Click an avatar by session id.
    pub fn click_avatar(&self, session: i32) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.avatar_click(session))
    }

    /// Click an object, optionally addressed to one session, with a
    /// world-space hit point.
    pub fn click_object(&self, object_id: i32, to_session: i32, hit: Vector3) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(
            self.transport
                .object_click(object_id, to_session, hit.x, hit.y, hit.z),
        )
    }

    /// Teleport an avatar. An empty world name teleports within the
    /// current world.
    pub fn teleport_avatar(
        &self,
        target_session: i32,
        world: &str,
        position: Vector3,
        yaw: f64,
        pitch: f64,
    ) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.teleport_avatar(
            target_session,
            world,
            position.x,
            position.y,
            position.z,
            yaw,
            pitch,
        ))
    }

    /// Query a user's attributes by user id. The answer arrives as a
    /// [`UserAttributesReceived`](crate::events::SessionEvent::UserAttributesReceived)
    /// event.
    pub fn get_user_profile(&self, user_id: i32) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.user_attributes_by_id(user_id))
    }

    /// Request the universe world list. Entries arrive as
    /// [`WorldListed`](crate::events::SessionEvent::WorldListed) events.
    pub fn list_worlds(&self) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.list_worlds())
    }

    /// Query a cell's objects. Results arrive as
    /// [`CellObject`](crate::events::SessionEvent::CellObject) events,
    /// terminated by [`CellEnd`](crate::events::SessionEvent::CellEnd).
    pub fn query_cell(&self, cell_x: i32, cell_z: i32, revision: i32) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.query_cell(cell_x, cell_z, revision))
    }

    /// Query a terrain tile.
    pub fn query_terrain(&self, tile_x: i32, tile_z: i32, revision: i32) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.terrain_query(tile_x, tile_z, revision))
    }

    /// Ask to join another user.
    pub fn join(&self, user_id: i32) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.join_user(user_id))
    }

    /// Accept a join request, placing the requester in a world.
    pub fn join_accept(
        &self,
        request: &JoinRequest,
        world: &str,
        position: Vector3,
        yaw: f64,
        pitch: f64,
    ) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.join_accept(
            request.id, world, position.x, position.y, position.z, yaw, pitch,
        ))
    }

    /// Decline a join request.
    pub fn join_decline(&self, request: &JoinRequest) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.join_decline(request.id))
    }

    /// Grant or revoke a world permission for a user id.
    pub fn world_permission_user(
        &self,
        permission: &str,
        user_id: i32,
        enable: bool,
    ) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(
            self.transport
                .world_permission_user_set(permission, user_id, enable),
        )
    }

    /// Grant or revoke a world permission for a session.
    pub fn world_permission_session(
        &self,
        permission: &str,
        session: i32,
        enable: bool,
    ) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(
            self.transport
                .world_permission_session_set(permission, session, enable),
        )
    }

    /// Set a world setting, optionally addressed to one session.
    pub fn world_setting_session(
        &self,
        setting: &str,
        value: &str,
        to_session: i32,
    ) -> SessionResult<()> {
        let _core = self.core.lock();
        check_reason(self.transport.world_setting_set(setting, value, to_session))
    }
}
