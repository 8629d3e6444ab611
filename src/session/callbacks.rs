//! Dispatch of solicited native callbacks.
//!
//! [`Session::handle_callback`] is the ingress for answers to requests
//! this client sent: the transport echoes a reason code and, for
//! table-correlated operations, the correlation id staged into the
//! `ReferenceNumber` register before the send. Bootstrap answers (connect,
//! login, enter) carry no correlation id and complete their dedicated
//! slots instead.
//!
//! An unknown correlation id — a late answer for an operation that was
//! rolled back or drained — is logged and discarded; it must never crash
//! the dispatcher.

use super::dispatch::read_object;
use super::{Completion, Effects, Session, SessionCore};
use crate::error::{BootstrapKind, SessionError, SessionResult};
use crate::events::{EventKind, SessionEvent};
use crate::session::ConnectionState;
use crate::state::{Friend, Outcome};
use crate::transport::AttributeReader;
use tracing::{debug, warn};
use worldgate_proto::{AttributeError, Callback, IntAttribute, StringAttribute};

impl Session {
    /// Ingress for one solicited native callback.
    pub fn handle_callback(
        &self,
        slot: Callback,
        rc: i32,
        reference: i32,
        handle: &dyn AttributeReader,
    ) {
        let applied = {
            let mut core = self.core.lock();
            self.apply_callback(&mut core, slot, rc, reference, handle)
        };
        match applied {
            Ok(effects) => self.run_effects(effects),
            Err(err) => {
                // The entry, if any, stays registered; a leak here shows up
                // in `pending_operations` and is cleared at disconnect.
                warn!(?slot, reference, error = %err, "dropping undecodable callback")
            }
        }
    }

    fn apply_callback(
        &self,
        core: &mut SessionCore,
        slot: Callback,
        rc: i32,
        reference: i32,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        match slot {
            Callback::ConnectUniverse => {
                Ok(self.complete_bootstrap(core, BootstrapKind::Connect, rc))
            }
            Callback::Login => Ok(self.complete_bootstrap(core, BootstrapKind::Login, rc)),
            Callback::Enter => Ok(self.complete_enter(core, rc)),
            Callback::ObjectAdd | Callback::ObjectLoad => {
                let outcome = if rc == 0 {
                    Ok(Outcome::ObjectId(handle.int(IntAttribute::ObjectId)?))
                } else {
                    Err(SessionError::rejected(rc))
                };
                Ok(self.complete_op(core, slot, reference, outcome))
            }
            Callback::ObjectChange | Callback::ObjectDelete => {
                let outcome = result_of(rc).map(|_| Outcome::Done);
                Ok(self.complete_op(core, slot, reference, outcome))
            }
            Callback::ObjectGet => {
                let outcome = if rc == 0 {
                    Ok(Outcome::Object(read_object(handle)?))
                } else {
                    Err(SessionError::rejected(rc))
                };
                Ok(self.complete_op(core, slot, reference, outcome))
            }
            Callback::FriendAdd => {
                let mut effects =
                    self.complete_op(core, slot, reference, result_of(rc).map(|_| Outcome::Done));
                if rc == 0 && self.bus.has_subscribers(EventKind::FriendAdded) {
                    effects.event = Some(SessionEvent::FriendAdded {
                        friend: read_friend_lossy(handle),
                    });
                }
                Ok(effects)
            }
            Callback::FriendDelete => {
                let mut effects =
                    self.complete_op(core, slot, reference, result_of(rc).map(|_| Outcome::Done));
                if rc == 0 && self.bus.has_subscribers(EventKind::FriendDeleted) {
                    effects.event = Some(SessionEvent::FriendDeleted {
                        friend_id: handle.int(IntAttribute::FriendId).unwrap_or(0),
                    });
                }
                Ok(effects)
            }
            Callback::GetFriends => self.on_friend_entry(core, rc, reference, handle),
            Callback::Join
            | Callback::WorldPermissionUserSet
            | Callback::WorldPermissionSessionSet
            | Callback::WorldSettingSet => {
                debug!(?slot, rc, reference, "callback slot without a consumer");
                Ok(Effects::none())
            }
        }
    }

    /// Complete the connect or login slot and apply the state transition.
    fn complete_bootstrap(
        &self,
        core: &mut SessionCore,
        kind: BootstrapKind,
        rc: i32,
    ) -> Effects {
        let Some(slot) = core.slot(kind).take() else {
            warn!(%kind, rc, "bootstrap callback without an operation in flight");
            return Effects::none();
        };
        let result = result_of(rc);
        core.state = if result.is_ok() {
            ConnectionState::Connected
        } else {
            slot.rollback
        };
        Effects::complete(Completion::Slot(slot.tx, result))
    }

    /// Complete the enter slot; success lands in the world and announces it.
    fn complete_enter(&self, core: &mut SessionCore, rc: i32) -> Effects {
        let Some(slot) = core.slot(BootstrapKind::Enter).take() else {
            warn!(rc, "enter callback without an operation in flight");
            return Effects::none();
        };
        let result = result_of(rc);
        let mut effects;
        if result.is_ok() {
            core.state = ConnectionState::InWorld;
            effects = Effects::complete(Completion::Slot(slot.tx, result));
            if self.bus.has_subscribers(EventKind::WorldEntered)
                && let Some(world) = core
                    .current_world
                    .as_deref()
                    .and_then(|name| core.worlds.get(name))
            {
                effects.event = Some(SessionEvent::WorldEntered { world });
            }
        } else {
            core.state = slot.rollback;
            effects = Effects::complete(Completion::Slot(slot.tx, result));
        }
        effects
    }

    /// Remove and complete one pending-table operation.
    fn complete_op(
        &self,
        core: &mut SessionCore,
        slot: Callback,
        reference: i32,
        outcome: SessionResult<Outcome>,
    ) -> Effects {
        match core.pending.remove(reference) {
            Some(op) => Effects::complete(Completion::Op(op, outcome)),
            None => {
                warn!(?slot, reference, "callback for unknown correlation id");
                Effects::none()
            }
        }
    }

    /// One streamed friend-list entry. The stream terminates with an entry
    /// whose id register is zero; that invocation resolves the operation
    /// with everything accumulated before it.
    fn on_friend_entry(
        &self,
        core: &mut SessionCore,
        rc: i32,
        reference: i32,
        handle: &dyn AttributeReader,
    ) -> Result<Effects, AttributeError> {
        if rc != 0 {
            return Ok(self.complete_op(
                core,
                Callback::GetFriends,
                reference,
                Err(SessionError::rejected(rc)),
            ));
        }

        let id = handle.int(IntAttribute::FriendId)?;
        if id == 0 {
            return Ok(match core.pending.remove(reference) {
                Some(mut op) => {
                    let friends = std::mem::take(&mut op.friends);
                    Effects::complete(Completion::Op(op, Ok(Outcome::Friends(friends))))
                }
                None => {
                    warn!(reference, "friend-list terminator for unknown correlation id");
                    Effects::none()
                }
            });
        }

        let friend = Friend {
            id,
            user_id: handle.int(IntAttribute::FriendUserId)?,
            name: handle.string(StringAttribute::FriendName)?,
            online: handle.int(IntAttribute::FriendOnline)? == 1,
        };
        if !core.pending.append_friend(reference, friend.clone()) {
            warn!(reference, "friend-list entry for unknown correlation id");
            return Ok(Effects::none());
        }
        if self.bus.has_subscribers(EventKind::FriendListed) {
            return Ok(Effects::emit(SessionEvent::FriendListed { friend }));
        }
        Ok(Effects::none())
    }
}

/// Decode a friend payload tolerantly; callbacks after add operations may
/// not carry every register.
fn read_friend_lossy(handle: &dyn AttributeReader) -> Friend {
    Friend {
        id: handle.int(IntAttribute::FriendId).unwrap_or(0),
        user_id: handle.int(IntAttribute::FriendUserId).unwrap_or(0),
        name: handle.string(StringAttribute::FriendName).unwrap_or_default(),
        online: handle.int(IntAttribute::FriendOnline).unwrap_or(0) == 1,
    }
}

fn result_of(rc: i32) -> SessionResult<()> {
    if rc == 0 {
        Ok(())
    } else {
        Err(SessionError::rejected(rc))
    }
}
