//! Dispatch of unsolicited native events.
//!
//! [`Session::handle_event`] is the ingress the transport glue calls for
//! every pushed notification. Decode and cache mutation run under the
//! session lock; subscriber delivery and any deferred completions run
//! after it is released.
//!
//! A malformed handle aborts only the callback it arrived on: the error is
//! logged and the dispatcher keeps going. Where the source protocol skips
//! an event entirely when nobody subscribed, the cache mutation still
//! happens here — only the payload construction is skipped.

use super::{ConnectionState, Effects, Session, SessionCore};
use crate::events::{EventKind, SessionEvent};
use crate::state::{
    Avatar, BumpPhase, Cell, ChatKind, ChatMessage, Color, DisconnectReason, JoinRequest,
    Teleport, UserAttributes, WorldObject, World, WorldState,
};
use crate::transport::AttributeReader;
use chrono::{DateTime, TimeZone, Utc};
use std::time::Duration;
use tracing::{debug, warn};
use worldgate_proto::{
    AttributeError, DataAttribute, Event, FloatAttribute, IntAttribute, StringAttribute, Vector3,
};

impl Session {
    /// Ingress for one unsolicited native event.
    ///
    /// Never panics and never propagates decode failures; a handle that
    /// cannot be read drops this event and leaves the session consistent.
    pub fn handle_event(&self, slot: Event, handle: &dyn AttributeReader) {
        let applied = {
            let mut core = self.core.lock();
            self.apply_event(&mut core, slot, handle)
        };
        match applied {
            Ok(effects) => self.run_effects(effects),
            Err(err) => warn!(?slot, error = %err, "dropping undecodable event"),
        }
    }

    /// Decode one event and mutate the caches. Runs under the session lock.
    fn apply_event(
        &self,
        core: &mut SessionCore,
        slot: Event,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        match slot {
            Event::Chat => self.on_chat(core, handle),
            Event::AvatarAdd => self.on_avatar_add(core, handle),
            Event::AvatarChange => self.on_avatar_change(core, handle),
            Event::AvatarDelete => self.on_avatar_delete(core, handle),
            Event::AvatarClick => self.on_avatar_click(core, handle),
            Event::WorldList => self.on_world_list(core, handle),
            Event::WorldSetting => self.on_world_setting(core, handle),
            Event::WorldSettingsChanged => Ok(self.on_world_settings_changed(core)),
            Event::WorldDisconnect => Ok(self.on_world_disconnect(core)),
            Event::ObjectCreate => self.on_object_create(core, handle),
            Event::ObjectChange => self.on_object_change(core, handle),
            Event::ObjectDelete => self.on_object_delete(core, handle),
            Event::ObjectClick => self.on_object_click(core, handle),
            Event::ObjectBumpBegin => self.on_object_bump(core, handle, BumpPhase::Begin),
            Event::ObjectBumpEnd => self.on_object_bump(core, handle, BumpPhase::End),
            Event::QueryCellEnd => self.on_query_cell_end(handle),
            Event::UniverseDisconnect => Ok(self.on_universe_disconnect(core, handle)),
            Event::Teleport => self.on_teleport(core, handle),
            Event::UserAttributes => self.on_user_attributes(handle),
            Event::Join => self.on_join(handle),
        }
    }

    fn on_chat(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        let session = handle.int(IntAttribute::AvatarSession)?;
        let name = handle.string(StringAttribute::AvatarName)?;

        // A chat line from an unseen session is the first sighting of that
        // avatar: cache it with what little the event carries, whether or
        // not anyone subscribed.
        if core.avatars.get(session).is_none() {
            core.avatars.upsert(Avatar {
                session,
                name: name.clone(),
                ..Avatar::default()
            });
        }

        if !self.bus.has_subscribers(EventKind::Chat) {
            return Ok(Effects::none());
        }

        let kind = ChatKind::from(handle.int(IntAttribute::ChatType)?);
        let color = if kind == ChatKind::Console {
            Color {
                r: handle.int(IntAttribute::ChatColorRed)? as u8,
                g: handle.int(IntAttribute::ChatColorGreen)? as u8,
                b: handle.int(IntAttribute::ChatColorBlue)? as u8,
            }
        } else {
            Color::default()
        };
        let message = ChatMessage {
            kind,
            name: name.clone(),
            text: handle.string(StringAttribute::ChatMessage)?,
            color,
            effects: handle.int(IntAttribute::ChatEffects).unwrap_or(0),
        };
        let avatar = core.avatars.get_or_create(session);
        Ok(Effects::emit(SessionEvent::Chat { avatar, message }))
    }

    fn on_avatar_add(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        let mut avatar = read_event_avatar(handle)?;
        avatar.user_id = handle.int(IntAttribute::UserId)?;
        avatar.last_changed = Some(Utc::now());
        core.avatars.insert_if_absent(avatar.clone());

        if !self.bus.has_subscribers(EventKind::AvatarEntered) {
            return Ok(Effects::none());
        }
        Ok(Effects::emit(SessionEvent::AvatarEntered { avatar }))
    }

    fn on_avatar_change(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        let incoming = read_event_avatar(handle)?;
        match core.avatars.apply_change(incoming, Utc::now()) {
            Some((previous, avatar)) if self.bus.has_subscribers(EventKind::AvatarChanged) => {
                Ok(Effects::emit(SessionEvent::AvatarChanged { avatar, previous }))
            }
            _ => Ok(Effects::none()),
        }
    }

    fn on_avatar_delete(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        let session = handle.int(IntAttribute::AvatarSession)?;
        match core.avatars.remove(session) {
            Some(avatar) if self.bus.has_subscribers(EventKind::AvatarLeft) => {
                Ok(Effects::emit(SessionEvent::AvatarLeft { avatar }))
            }
            _ => Ok(Effects::none()),
        }
    }

    fn on_avatar_click(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        if !self.bus.has_subscribers(EventKind::AvatarClicked) {
            return Ok(Effects::none());
        }
        let session = handle.int(IntAttribute::AvatarSession)?;
        let mut clicked = handle.int(IntAttribute::ClickedSession)?;
        if clicked == 0 {
            clicked = session;
        }
        let avatar = core.avatars.get_or_create(session);
        let clicked = core.avatars.get_or_create(clicked);
        Ok(Effects::emit(SessionEvent::AvatarClicked {
            avatar,
            clicked,
            hit: read_click_hit(handle)?,
        }))
    }

    fn on_world_list(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        let world = World {
            name: handle.string(StringAttribute::WorldName)?,
            state: WorldState::from(handle.int(IntAttribute::WorldState)?),
            user_count: handle.int(IntAttribute::WorldUsers)?,
            ..World::default()
        };
        // A re-listing replaces the cached world outright.
        core.worlds.upsert(world.clone());

        if !self.bus.has_subscribers(EventKind::WorldListed) {
            return Ok(Effects::none());
        }
        Ok(Effects::emit(SessionEvent::WorldListed { world }))
    }

    fn on_world_setting(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        let key = handle.string(StringAttribute::WorldSettingKey)?;
        let value = handle.string(StringAttribute::WorldSettingValue)?;
        match core.current_world.clone() {
            Some(name) => core.worlds.merge_setting(&name, key, value),
            None => debug!(%key, "world setting received outside an enter; ignored"),
        }
        Ok(Effects::none())
    }

    fn on_world_settings_changed(&self, core: &mut SessionCore) -> Effects {
        if !self.bus.has_subscribers(EventKind::WorldSettingsChanged) {
            return Effects::none();
        }
        match core
            .current_world
            .as_deref()
            .and_then(|name| core.worlds.get(name))
        {
            Some(world) => Effects::emit(SessionEvent::WorldSettingsChanged { world }),
            None => Effects::none(),
        }
    }

    fn on_world_disconnect(&self, core: &mut SessionCore) -> Effects {
        if core.state == ConnectionState::InWorld {
            core.state = ConnectionState::Connected;
        }
        if !self.bus.has_subscribers(EventKind::WorldDisconnected) {
            return Effects::none();
        }
        let world = core
            .current_world
            .as_deref()
            .and_then(|name| core.worlds.get(name));
        Effects::emit(SessionEvent::WorldDisconnected { world })
    }

    fn on_universe_disconnect(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Effects {
        // Teardown must run even when the reason cannot be decoded.
        let reason = handle
            .int(IntAttribute::DisconnectReason)
            .map(DisconnectReason::from)
            .unwrap_or(DisconnectReason::ConnectionLost);

        let mut effects = core.abandon_in_flight();
        core.avatars.clear();
        core.current_world = None;
        core.state = ConnectionState::Disconnected;
        effects.event = Some(SessionEvent::UniverseDisconnected { reason });
        effects
    }

    fn on_object_create(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        let created = self.bus.has_subscribers(EventKind::ObjectCreated);
        let cell = self.bus.has_subscribers(EventKind::CellObject);
        if !created && !cell {
            return Ok(Effects::none());
        }
        let session = handle.int(IntAttribute::AvatarSession)?;
        let object = read_object(handle)?;
        // Cell-query results arrive on this slot with a zero session.
        if session == 0 {
            if !cell {
                return Ok(Effects::none());
            }
            return Ok(Effects::emit(SessionEvent::CellObject { object }));
        }
        if !created {
            return Ok(Effects::none());
        }
        let builder = core.avatars.get_or_create(session);
        Ok(Effects::emit(SessionEvent::ObjectCreated { builder, object }))
    }

    fn on_object_change(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        if !self.bus.has_subscribers(EventKind::ObjectChanged) {
            return Ok(Effects::none());
        }
        let session = handle.int(IntAttribute::AvatarSession)?;
        let object = read_object(handle)?;
        let builder = core.avatars.get_or_create(session);
        Ok(Effects::emit(SessionEvent::ObjectChanged { builder, object }))
    }

    fn on_object_delete(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        if !self.bus.has_subscribers(EventKind::ObjectDeleted) {
            return Ok(Effects::none());
        }
        let session = handle.int(IntAttribute::AvatarSession)?;
        let object_id = handle.int(IntAttribute::ObjectId)?;
        let builder = core.avatars.get_or_create(session);
        Ok(Effects::emit(SessionEvent::ObjectDeleted { builder, object_id }))
    }

    fn on_object_click(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        if !self.bus.has_subscribers(EventKind::ObjectClicked) {
            return Ok(Effects::none());
        }
        let session = handle.int(IntAttribute::AvatarSession)?;
        let object_id = handle.int(IntAttribute::ObjectId)?;
        let avatar = core.avatars.get_or_create(session);
        Ok(Effects::emit(SessionEvent::ObjectClicked {
            avatar,
            object_id,
            hit: read_click_hit(handle)?,
        }))
    }

    fn on_object_bump(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
        phase: BumpPhase,
    ) -> Result<Effects, AttributeError> {
        if !self.bus.has_subscribers(EventKind::ObjectBumped) {
            return Ok(Effects::none());
        }
        let session = handle.int(IntAttribute::AvatarSession)?;
        let object_id = handle.int(IntAttribute::ObjectId)?;
        let avatar = core.avatars.get_or_create(session);
        Ok(Effects::emit(SessionEvent::ObjectBumped {
            avatar,
            object_id,
            phase,
        }))
    }

    fn on_query_cell_end(&self, handle: &dyn AttributeReader) -> Result<Effects, AttributeError> {
        if !self.bus.has_subscribers(EventKind::CellEnd) {
            return Ok(Effects::none());
        }
        let cell = Cell {
            x: handle.int(IntAttribute::CellX)?,
            z: handle.int(IntAttribute::CellZ)?,
        };
        Ok(Effects::emit(SessionEvent::CellEnd { cell }))
    }

    fn on_teleport(
        &self,
        core: &mut SessionCore,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        if !self.bus.has_subscribers(EventKind::Teleported) {
            return Ok(Effects::none());
        }
        let session = handle.int(IntAttribute::AvatarSession)?;
        let teleport = Teleport {
            avatar: core.avatars.get_or_create(session),
            position: Vector3::new(
                handle.float(FloatAttribute::TeleportX)?,
                handle.float(FloatAttribute::TeleportY)?,
                handle.float(FloatAttribute::TeleportZ)?,
            ),
            // Roll is unsupported; it stays zero.
            rotation: Vector3::new(
                handle.float(FloatAttribute::TeleportPitch)?,
                handle.float(FloatAttribute::TeleportYaw)?,
                0.0,
            ),
            world: handle.string(StringAttribute::TeleportWorld)?,
        };
        Ok(Effects::emit(SessionEvent::Teleported { teleport }))
    }

    fn on_user_attributes(
        &self,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        if !self.bus.has_subscribers(EventKind::UserAttributesReceived) {
            return Ok(Effects::none());
        }
        let attributes = UserAttributes {
            id: handle.int(IntAttribute::UserId)?,
            name: handle.string(StringAttribute::UserName)?,
            email: handle.string(StringAttribute::UserEmail)?,
            last_login: unix_time(handle.int(IntAttribute::UserLastLogin)?),
            online_time: Duration::from_secs(
                handle.int(IntAttribute::UserOnlineTime)?.max(0) as u64
            ),
            registration_date: unix_time(handle.int(IntAttribute::UserRegistrationTime)?),
        };
        Ok(Effects::emit(SessionEvent::UserAttributesReceived { attributes }))
    }

    fn on_join(&self, handle: &dyn AttributeReader) -> Result<Effects, AttributeError> {
        if !self.bus.has_subscribers(EventKind::JoinRequested) {
            return Ok(Effects::none());
        }
        let request = JoinRequest {
            id: handle.int(IntAttribute::JoinId)?,
            user_id: handle.int(IntAttribute::UserId)?,
            name: handle.string(StringAttribute::JoinName)?,
        };
        Ok(Effects::emit(SessionEvent::JoinRequested { request }))
    }
}

/// Decode the avatar fields carried by add/change events. The user id is
/// not among them; add events read it separately and change events take it
/// from the cache.
fn read_event_avatar(handle: &dyn AttributeReader) -> Result<Avatar, AttributeError> {
    Ok(Avatar {
        session: handle.int(IntAttribute::AvatarSession)?,
        user_id: 0,
        name: handle.string(StringAttribute::AvatarName)?,
        avatar_type: handle.int(IntAttribute::AvatarType)?,
        position: Vector3::new(
            handle.float(FloatAttribute::AvatarX)?,
            handle.float(FloatAttribute::AvatarY)?,
            handle.float(FloatAttribute::AvatarZ)?,
        ),
        // Roll is unsupported; it stays zero.
        rotation: Vector3::new(
            handle.float(FloatAttribute::AvatarPitch)?,
            handle.float(FloatAttribute::AvatarYaw)?,
            0.0,
        ),
        last_changed: None,
        extensions: Default::default(),
    })
}

/// Decode a full object payload.
pub(crate) fn read_object(handle: &dyn AttributeReader) -> Result<WorldObject, AttributeError> {
    Ok(WorldObject {
        id: handle.int(IntAttribute::ObjectId)?,
        object_type: handle.int(IntAttribute::ObjectType)?,
        owner: handle.int(IntAttribute::ObjectUserId)?,
        time: unix_time(handle.int(IntAttribute::ObjectTime)?),
        model: handle.string(StringAttribute::ObjectModel)?,
        action: handle.string(StringAttribute::ObjectAction)?,
        description: handle.string(StringAttribute::ObjectDescription)?,
        data: handle.data(DataAttribute::ObjectData)?,
        position: Vector3::new(
            handle.float(FloatAttribute::ObjectX)?,
            handle.float(FloatAttribute::ObjectY)?,
            handle.float(FloatAttribute::ObjectZ)?,
        ),
        rotation: Vector3::new(
            handle.float(FloatAttribute::ObjectRotationX)?,
            handle.float(FloatAttribute::ObjectRotationY)?,
            handle.float(FloatAttribute::ObjectRotationZ)?,
        ),
        angle: handle.float(FloatAttribute::ObjectRotationAngle)?,
        extensions: Default::default(),
    })
}

fn read_click_hit(handle: &dyn AttributeReader) -> Result<Vector3, AttributeError> {
    Ok(Vector3::new(
        handle.float(FloatAttribute::ClickHitX)?,
        handle.float(FloatAttribute::ClickHitY)?,
        handle.float(FloatAttribute::ClickHitZ)?,
    ))
}

/// Map a unix-seconds field to a timestamp; zero means unset.
pub(crate) fn unix_time(secs: i32) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    Utc.timestamp_opt(i64::from(secs), 0).single()
}
