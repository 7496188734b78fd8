//! World identity and chunk-load queries consumed by the controller.

use std::collections::{HashMap, HashSet};

use geom::ChunkPos;
use parking_lot::RwLock;

/// Chunk-load oracle for the worlds the host server runs.
pub trait WorldView: Send + Sync {
    /// Whether the chunk at `chunk` in world `world_id` is currently loaded.
    fn chunk_loaded(&self, world_id: &str, chunk: ChunkPos) -> bool;
}

/// A [`WorldView`] that reports every chunk loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysLoaded;

impl WorldView for AlwaysLoaded {
    fn chunk_loaded(&self, _world_id: &str, _chunk: ChunkPos) -> bool {
        true
    }
}

/// A [`WorldView`] backed by an explicit loaded-chunk table.
#[derive(Default)]
pub struct StaticWorldView {
    loaded: RwLock<HashMap<String, HashSet<ChunkPos>>>,
}

impl StaticWorldView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks one chunk loaded.
    pub fn load_chunk(&self, world_id: &str, chunk: ChunkPos) {
        self.loaded
            .write()
            .entry(world_id.to_owned())
            .or_default()
            .insert(chunk);
    }

    /// Marks every chunk within `radius` of `center` loaded.
    pub fn load_around(&self, world_id: &str, center: ChunkPos, radius: i32) {
        let mut loaded = self.loaded.write();
        let chunks = loaded.entry(world_id.to_owned()).or_default();
        for x in (center.x - radius)..=(center.x + radius) {
            for z in (center.z - radius)..=(center.z + radius) {
                chunks.insert(ChunkPos { x, z });
            }
        }
    }

    /// Marks one chunk unloaded.
    pub fn unload_chunk(&self, world_id: &str, chunk: ChunkPos) {
        if let Some(chunks) = self.loaded.write().get_mut(world_id) {
            chunks.remove(&chunk);
        }
    }
}

impl WorldView for StaticWorldView {
    fn chunk_loaded(&self, world_id: &str, chunk: ChunkPos) -> bool {
        self.loaded
            .read()
            .get(world_id)
            .is_some_and(|chunks| chunks.contains(&chunk))
    }
}

/// The facts about a host world the identifier mappers work from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldRef {
    name: String,
    namespace: String,
    path: String,
}

impl WorldRef {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// A vanilla-style world where the key path equals the name.
    #[must_use]
    pub fn vanilla(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            namespace: "minecraft".to_owned(),
            name,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The world's key in `namespace:path` form.
    #[must_use]
    pub fn namespaced_key(&self) -> String {
        format!("{}:{}", self.namespace, self.path)
    }
}

/// Maps host worlds to the opaque string id stored on positions, and back.
///
/// The two implementations are interchangeable; a deployment picks one and
/// sticks with it, since ids written by one mapper are not resolvable by
/// the other.
pub trait WorldIdMapper: Send + Sync {
    /// Stable string identifier for `world`.
    fn extract_world_id(&self, world: &WorldRef) -> String;

    /// Finds the world in `worlds` that `id` identifies.
    fn resolve_world_id<'a>(&self, worlds: &'a [WorldRef], id: &str) -> Option<&'a WorldRef>;
}

/// Identifies worlds by plain name. Works on every server generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameWorldMapper;

impl WorldIdMapper for NameWorldMapper {
    fn extract_world_id(&self, world: &WorldRef) -> String {
        world.name().to_owned()
    }

    fn resolve_world_id<'a>(&self, worlds: &'a [WorldRef], id: &str) -> Option<&'a WorldRef> {
        worlds.iter().find(|world| world.name() == id)
    }
}

/// Identifies worlds by namespaced key, safe across world renames.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespacedWorldMapper;

impl WorldIdMapper for NamespacedWorldMapper {
    fn extract_world_id(&self, world: &WorldRef) -> String {
        world.namespaced_key()
    }

    fn resolve_world_id<'a>(&self, worlds: &'a [WorldRef], id: &str) -> Option<&'a WorldRef> {
        worlds.iter().find(|world| world.namespaced_key() == id)
    }
}
