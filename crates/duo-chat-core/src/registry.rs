//! In-memory connection bookkeeping.

use std::{
    collections::{HashMap, HashSet},
    sync::{PoisonError, RwLock},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConnectionId, ConnectionStatus, Identity};

/// An authenticated connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedUser {
    pub id: ConnectionId,
    pub authenticated: bool,
    pub user_identity: Identity,
    pub connected_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<ConnectionId, ConnectedUser>,
    user1: HashSet<ConnectionId>,
    user2: HashSet<ConnectionId>,
}

impl Inner {
    fn set_mut(&mut self, identity: Identity) -> &mut HashSet<ConnectionId> {
        match identity {
            Identity::User1 => &mut self.user1,
            Identity::User2 => &mut self.user2,
        }
    }

    fn status(&self) -> ConnectionStatus {
        ConnectionStatus::new(self.user1.len(), self.user2.len())
    }
}

/// Tracks which connections are authenticated and as whom.
///
/// Data is lost on restart.
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: RwLock<Inner>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as authenticated for `identity`.
    ///
    /// A connection that re-authenticates under another identity is moved.
    pub fn register(&self, id: ConnectionId, identity: Identity) -> ConnectionStatus {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = inner.users.get(&id).map(|u| u.user_identity) {
            inner.set_mut(previous).remove(&id);
        }

        inner.users.insert(
            id,
            ConnectedUser {
                id,
                authenticated: true,
                user_identity: identity,
                connected_at: Utc::now(),
            },
        );
        inner.set_mut(identity).insert(id);
        inner.status()
    }

    /// Forget `id`. Returns `None` if it never authenticated.
    pub fn unregister(&self, id: ConnectionId) -> Option<(ConnectedUser, ConnectionStatus)> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let user = inner.users.remove(&id)?;
        inner.set_mut(user.user_identity).remove(&id);
        Some((user, inner.status()))
    }

    #[must_use]
    pub fn get(&self, id: ConnectionId) -> Option<ConnectedUser> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .users
            .get(&id)
            .cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self, id: ConnectionId) -> bool {
        self.get(id).is_some_and(|u| u.authenticated)
    }

    /// Current per-identity counts.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_register_counts_per_identity() {
        let registry = ConnectionRegistry::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        registry.register(a, Identity::User1);
        registry.register(b, Identity::User1);
        let status = registry.register(c, Identity::User2);

        assert_eq!(status, ConnectionStatus::new(2, 1));
        assert!(registry.is_authenticated(a));
        assert_eq!(registry.get(c).unwrap().user_identity, Identity::User2);
    }

    #[test]
    fn test_unregister() {
        let registry = ConnectionRegistry::new();
        let a = Uuid::new_v4();
        registry.register(a, Identity::User2);

        let (user, status) = registry.unregister(a).unwrap();
        assert_eq!(user.id, a);
        assert_eq!(status, ConnectionStatus::new(0, 0));
        assert!(!registry.is_authenticated(a));
        assert!(registry.unregister(a).is_none());
    }

    #[test]
    fn test_reauthenticate_moves_connection() {
        let registry = ConnectionRegistry::new();
        let a = Uuid::new_v4();
        registry.register(a, Identity::User1);
        let status = registry.register(a, Identity::User2);
        assert_eq!(status, ConnectionStatus::new(0, 1));
    }

    #[test]
    fn test_unknown_connection() {
        let registry = ConnectionRegistry::new();
        assert!(registry.get(Uuid::new_v4()).is_none());
        assert_eq!(registry.status(), ConnectionStatus::default());
    }
}
