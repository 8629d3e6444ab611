//! Awaitable object operations.
//!
//! Each operation allocates a correlation id, registers it in the pending
//! table, stages the request registers and sends — all under one lock hold
//! so concurrent operations cannot interleave the shared registers — then
//! suspends until the matching callback resolves the entry. A synchronous
//! nonzero result code fails the operation immediately and removes the
//! registration.

use super::Session;
use crate::error::{SessionError, SessionResult};
use crate::state::{OpKind, Outcome, WorldObject};
use crate::telemetry::OpTimer;
use crate::transport::Transport;
use std::future::Future;
use tokio::sync::oneshot;
use worldgate_proto::{DataAttribute, FloatAttribute, IntAttribute, StringAttribute};

impl Session {
    /// Build a new object. Resolves with the server-assigned object id.
    pub fn add_object(
        &self,
        object: &WorldObject,
    ) -> impl Future<Output = SessionResult<i32>> + Send + use<> {
        let timer = OpTimer::new("object_add");
        let started = self.start_solicited(OpKind::ObjectAdd, |t| {
            stage_object(t, object);
            t.object_add()
        });
        async move {
            let _timer = timer;
            expect_object_id(Self::await_outcome(started).await)
        }
    }

    /// Change an existing object in place.
    pub fn change_object(
        &self,
        object: &WorldObject,
    ) -> impl Future<Output = SessionResult<()>> + Send + use<> {
        let timer = OpTimer::new("object_change");
        let started = self.start_solicited(OpKind::ObjectChange, |t| {
            stage_object(t, object);
            t.object_change()
        });
        async move {
            let _timer = timer;
            Self::await_outcome(started).await.map(|_| ())
        }
    }

    /// Delete an object by id.
    pub fn delete_object(
        &self,
        object_id: i32,
    ) -> impl Future<Output = SessionResult<()>> + Send + use<> {
        let timer = OpTimer::new("object_delete");
        let started =
            self.start_solicited(OpKind::ObjectDelete, |t| t.object_delete(object_id));
        async move {
            let _timer = timer;
            Self::await_outcome(started).await.map(|_| ())
        }
    }

    /// Fetch a full object by id.
    pub fn get_object(
        &self,
        object_id: i32,
    ) -> impl Future<Output = SessionResult<WorldObject>> + Send + use<> {
        let timer = OpTimer::new("object_get");
        let started = self.start_solicited(OpKind::ObjectGet, |t| t.object_get(object_id));
        async move {
            let _timer = timer;
            match Self::await_outcome(started).await? {
                Outcome::Object(object) => Ok(object),
                _ => Err(SessionError::InvariantViolation(
                    "object get resolved with an unexpected payload",
                )),
            }
        }
    }

    /// Import an object with its original owner and timestamp. Resolves
    /// with the server-assigned object id.
    pub fn load_object(
        &self,
        object: &WorldObject,
    ) -> impl Future<Output = SessionResult<i32>> + Send + use<> {
        let timer = OpTimer::new("object_load");
        let started = self.start_solicited(OpKind::ObjectLoad, |t| {
            stage_object(t, object);
            t.set_int(IntAttribute::ObjectUserId, object.owner);
            t.set_int(
                IntAttribute::ObjectTime,
                object.time.map_or(0, |time| time.timestamp() as i32),
            );
            t.object_load()
        });
        async move {
            let _timer = timer;
            expect_object_id(Self::await_outcome(started).await)
        }
    }

    /// Shared start path for table-correlated operations: allocate the
    /// correlation id, register it, stage and send under the session lock.
    pub(crate) fn start_solicited(
        &self,
        kind: OpKind,
        send: impl FnOnce(&dyn Transport) -> i32,
    ) -> SessionResult<oneshot::Receiver<SessionResult<Outcome>>> {
        let reference = self.refs.next();
        let mut core = self.core.lock();
        let rx = core.pending.register(reference, kind)?;
        let transport = self.transport.as_ref();
        transport.set_int(IntAttribute::ReferenceNumber, reference);
        let rc = send(transport);
        if rc != 0 {
            core.pending.cancel_if_present(reference);
            return Err(SessionError::rejected(rc));
        }
        Ok(rx)
    }
}

/// Stage the common object registers for add/change/load.
fn stage_object(t: &dyn Transport, object: &WorldObject) {
    t.set_int(IntAttribute::ObjectId, object.id);
    t.set_int(IntAttribute::ObjectType, object.object_type);
    t.set_string(StringAttribute::ObjectAction, &object.action);
    t.set_string(StringAttribute::ObjectDescription, &object.description);
    t.set_string(StringAttribute::ObjectModel, &object.model);
    t.set_data(DataAttribute::ObjectData, &object.data);
    t.set_float(FloatAttribute::ObjectX, object.position.x);
    t.set_float(FloatAttribute::ObjectY, object.position.y);
    t.set_float(FloatAttribute::ObjectZ, object.position.z);
    t.set_float(FloatAttribute::ObjectRotationX, object.rotation.x);
    t.set_float(FloatAttribute::ObjectRotationY, object.rotation.y);
    t.set_float(FloatAttribute::ObjectRotationZ, object.rotation.z);
    t.set_float(FloatAttribute::ObjectRotationAngle, object.angle);
}

fn expect_object_id(outcome: SessionResult<Outcome>) -> SessionResult<i32> {
    match outcome? {
        Outcome::ObjectId(id) => Ok(id),
        _ => Err(SessionError::InvariantViolation(
            "object operation resolved with an unexpected payload",
        )),
    }
}
