//! Awaitable friend operations.

use super::Session;
use crate::error::{SessionError, SessionResult};
use crate::state::{Friend, OpKind, Outcome};
use crate::telemetry::OpTimer;
use std::future::Future;

impl Session {
    /// Fetch the friend list.
    ///
    /// Entries stream back one callback at a time; each is also published
    /// as [`FriendListed`](crate::events::SessionEvent::FriendListed), and
    /// the operation resolves with the complete list once the stream
    /// terminates.
    pub fn list_friends(&self) -> impl Future<Output = SessionResult<Vec<Friend>>> + Send + use<> {
        let timer = OpTimer::new("friends_get");
        let started = self.start_solicited(OpKind::FriendList, |t| t.friends_get());
        async move {
            let _timer = timer;
            match Self::await_outcome(started).await? {
                Outcome::Friends(friends) => Ok(friends),
                _ => Err(SessionError::InvariantViolation(
                    "friend list resolved with an unexpected payload",
                )),
            }
        }
    }

    /// Add a friend by account name.
    pub fn add_friend_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = SessionResult<()>> + Send + use<> {
        let timer = OpTimer::new("friend_add");
        let started = self.start_solicited(OpKind::FriendAdd, |t| t.friend_add_by_name(name));
        async move {
            let _timer = timer;
            Self::await_outcome(started).await.map(|_| ())
        }
    }

    /// Delete a friend by entry id.
    pub fn delete_friend(
        &self,
        friend_id: i32,
    ) -> impl Future<Output = SessionResult<()>> + Send + use<> {
        let timer = OpTimer::new("friend_delete");
        let started = self.start_solicited(OpKind::FriendDelete, |t| t.friend_delete(friend_id));
        async move {
            let _timer = timer;
            Self::await_outcome(started).await.map(|_| ())
        }
    }
}
