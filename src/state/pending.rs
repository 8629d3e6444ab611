//! The pending-operation table.
//!
//! Maps a correlation id to the unresolved outcome of one in-flight
//! solicited operation. Every successful [`PendingOps::register`] is
//! terminated exactly once: resolved or rejected by the dispatcher,
//! cancelled when the outbound send fails synchronously, or drained when
//! the session goes away. The table's size is the leak indicator exposed
//! through [`Session::pending_operations`](crate::Session::pending_operations).

use crate::error::{SessionError, SessionResult};
use crate::state::{Friend, WorldObject};
use std::collections::HashMap;
use tokio::sync::oneshot;
use tracing::{debug, error};

/// What kind of operation a table entry belongs to. Diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpKind {
    ObjectAdd,
    ObjectChange,
    ObjectDelete,
    ObjectGet,
    ObjectLoad,
    FriendAdd,
    FriendDelete,
    FriendList,
}

/// Successful payload of a solicited operation.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// No payload beyond success.
    Done,
    /// A server-assigned object id.
    ObjectId(i32),
    /// A fully decoded object.
    Object(WorldObject),
    /// An accumulated friend list.
    Friends(Vec<Friend>),
}

type OutcomeSender = oneshot::Sender<SessionResult<Outcome>>;

/// One live table entry, removed from the table before completion so the
/// oneshot send can happen outside the session lock.
#[derive(Debug)]
pub(crate) struct PendingOp {
    pub kind: OpKind,
    tx: OutcomeSender,
    /// Friend-list entries accumulated across streamed callbacks.
    pub friends: Vec<Friend>,
}

impl PendingOp {
    /// Complete with a success payload. A dropped receiver (the caller
    /// went away) is fine; the result is simply discarded.
    pub fn resolve(self, outcome: Outcome) {
        let _ = self.tx.send(Ok(outcome));
    }

    /// Complete with a failure.
    pub fn reject(self, err: SessionError) {
        let _ = self.tx.send(Err(err));
    }
}

/// Correlation id → pending operation. Lives behind the session mutex.
#[derive(Debug, Default)]
pub(crate) struct PendingOps {
    entries: HashMap<i32, PendingOp>,
}

impl PendingOps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a new unresolved entry keyed by `id`.
    ///
    /// A duplicate id cannot happen given the allocator's guarantees; if
    /// observed it is a programming defect, reported loudly rather than
    /// silently overwriting the first caller's entry.
    pub fn register(
        &mut self,
        id: i32,
        kind: OpKind,
    ) -> SessionResult<oneshot::Receiver<SessionResult<Outcome>>> {
        if self.entries.contains_key(&id) {
            debug_assert!(false, "correlation id {id} already registered");
            error!(reference = id, ?kind, "correlation id collision");
            return Err(SessionError::InvariantViolation(
                "correlation id already registered",
            ));
        }
        let (tx, rx) = oneshot::channel();
        self.entries.insert(
            id,
            PendingOp {
                kind,
                tx,
                friends: Vec::new(),
            },
        );
        Ok(rx)
    }

    /// Remove the entry for `id` so the caller can complete it outside the
    /// session lock. An unknown id — an unsolicited or late callback after
    /// a rollback — returns `None` and is logged by the caller.
    pub fn remove(&mut self, id: i32) -> Option<PendingOp> {
        self.entries.remove(&id)
    }

    /// Discard a registration whose outbound send failed synchronously.
    /// No receiver result is produced; the caller still holds the error
    /// from the send itself.
    pub fn cancel_if_present(&mut self, id: i32) {
        if let Some(op) = self.entries.remove(&id) {
            debug!(
                reference = id,
                kind = ?op.kind,
                "cancelled pending operation after failed send"
            );
        }
    }

    /// Append a streamed friend entry to a friend-list operation.
    /// Returns whether the id was live.
    pub fn append_friend(&mut self, id: i32, friend: Friend) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.friends.push(friend);
                true
            }
            None => false,
        }
    }

    /// Remove every entry, for completion with a terminal error after the
    /// session lock is released (universe disconnect, teardown).
    pub fn drain(&mut self) -> Vec<PendingOp> {
        let ops: Vec<PendingOp> = self.entries.drain().map(|(_, op)| op).collect();
        for op in &ops {
            debug!(kind = ?op.kind, "abandoning in-flight operation");
        }
        ops
    }

    /// Number of outstanding operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no operations are outstanding.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_returns_to_zero_after_terminal_completions() {
        let mut table = PendingOps::new();
        let rx1 = table.register(1, OpKind::ObjectAdd).unwrap();
        let rx2 = table.register(2, OpKind::ObjectDelete).unwrap();
        let _rx3 = table.register(3, OpKind::ObjectGet).unwrap();
        assert_eq!(table.len(), 3);

        table.remove(1).unwrap().resolve(Outcome::ObjectId(77));
        table.remove(2).unwrap().reject(SessionError::Terminated);
        table.cancel_if_present(3);
        assert!(table.is_empty());

        assert!(matches!(
            rx1.blocking_recv().unwrap(),
            Ok(Outcome::ObjectId(77))
        ));
        assert!(matches!(
            rx2.blocking_recv().unwrap(),
            Err(SessionError::Terminated)
        ));
    }

    #[test]
    fn test_unknown_id_is_a_noop() {
        let mut table = PendingOps::new();
        assert!(table.remove(99).is_none());
        table.cancel_if_present(99);
        assert!(!table.append_friend(99, friend(1)));
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_registration_is_an_invariant_violation() {
        let mut table = PendingOps::new();
        let _rx = table.register(5, OpKind::FriendAdd).unwrap();
        // debug_assert fires in debug builds; exercise the release path.
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            table.register(5, OpKind::FriendAdd).map(|_| ())
        }));
        match outcome {
            // Release build: loud error, first entry untouched.
            Ok(result) => {
                assert_eq!(
                    result,
                    Err(SessionError::InvariantViolation(
                        "correlation id already registered"
                    ))
                );
                assert_eq!(table.len(), 1);
            }
            // Debug build: the debug_assert fired, which is the point.
            Err(_) => {}
        }
    }

    #[test]
    fn test_friend_accumulation() {
        let mut table = PendingOps::new();
        let rx = table.register(7, OpKind::FriendList).unwrap();
        assert!(table.append_friend(7, friend(1)));
        assert!(table.append_friend(7, friend(2)));

        let op = table.remove(7).unwrap();
        assert_eq!(op.friends.len(), 2);
        let friends = op.friends.clone();
        op.resolve(Outcome::Friends(friends));

        match rx.blocking_recv().unwrap() {
            Ok(Outcome::Friends(list)) => assert_eq!(list.len(), 2),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_drain_completes_everything() {
        let mut table = PendingOps::new();
        let rx1 = table.register(1, OpKind::ObjectAdd).unwrap();
        let rx2 = table.register(2, OpKind::FriendList).unwrap();

        for op in table.drain() {
            op.reject(SessionError::Terminated);
        }
        assert!(table.is_empty());
        assert!(matches!(
            rx1.blocking_recv().unwrap(),
            Err(SessionError::Terminated)
        ));
        assert!(matches!(
            rx2.blocking_recv().unwrap(),
            Err(SessionError::Terminated)
        ));
    }

    #[test]
    fn test_resolve_with_dropped_receiver_does_not_panic() {
        let mut table = PendingOps::new();
        let rx = table.register(4, OpKind::ObjectChange).unwrap();
        drop(rx);
        table.remove(4).unwrap().resolve(Outcome::Done);
    }

    fn friend(id: i32) -> Friend {
        Friend {
            id,
            user_id: id * 10,
            name: format!("friend-{id}"),
            online: id % 2 == 0,
        }
    }
}
