//! The world side of the entity cache.

use super::Extensions;
use std::collections::HashMap;
use std::path::PathBuf;

/// Lifecycle state of a world as reported by the universe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorldState {
    /// Not reported yet.
    #[default]
    Unknown,
    /// Accepting entries.
    Online,
    /// Listed but down.
    Offline,
}

impl From<i32> for WorldState {
    fn from(raw: i32) -> Self {
        match raw {
            1 => WorldState::Online,
            2 => WorldState::Offline,
            _ => WorldState::Unknown,
        }
    }
}

/// A world known to the session.
///
/// Identity is the case-sensitive name, unique per universe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    /// World name.
    pub name: String,
    /// Reported lifecycle state.
    pub state: WorldState,
    /// Reported user count; -1 when unreported.
    pub user_count: i32,
    /// Key/value settings, last write wins.
    pub settings: HashMap<String, String>,
    /// Local object-cache directory, if the application configured one.
    pub local_cache_path: Option<PathBuf>,
    /// Application-defined extension fields.
    pub extensions: Extensions,
}

impl World {
    /// A world known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        World {
            name: name.into(),
            user_count: -1,
            ..World::default()
        }
    }
}

/// Authoritative name → world mapping.
///
/// A world is *replaced* when re-listed by the universe, but *merged*
/// (same entry, settings applied incrementally) during the settings stream
/// that follows entering it. Worlds are never removed, only superseded.
#[derive(Debug, Default)]
pub struct WorldRegistry {
    worlds: HashMap<String, World>,
}

impl WorldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (or insert) a world under its name.
    pub fn upsert(&mut self, world: World) {
        self.worlds.insert(world.name.clone(), world);
    }

    /// Merge one setting into a world, creating it first if unseen.
    pub fn merge_setting(
        &mut self,
        name: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        let world = self
            .worlds
            .entry(name.to_string())
            .or_insert_with(|| World::named(name));
        world.settings.insert(key.into(), value.into());
    }

    /// Ensure a world entry exists, returning a mutable reference to it.
    pub fn ensure(&mut self, name: &str) -> &mut World {
        self.worlds
            .entry(name.to_string())
            .or_insert_with(|| World::named(name))
    }

    /// Look up a world by name. Returns a snapshot.
    pub fn get(&self, name: &str) -> Option<World> {
        self.worlds.get(name).cloned()
    }

    /// Snapshot of all known worlds.
    pub fn list(&self) -> Vec<World> {
        self.worlds.values().cloned().collect()
    }

    /// Number of known worlds.
    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    /// Whether no worlds are known.
    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}
