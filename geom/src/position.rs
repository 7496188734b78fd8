//! Immutable positions and derived block/chunk coordinates.

/// Mathematical floor of a coordinate, as a block index.
///
/// Unlike an `as i32` cast this floors toward negative infinity, so
/// `floor(-0.5) == -1` rather than `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn floor(coord: f64) -> i32 {
    let truncated = coord as i32;
    if coord < f64::from(truncated) {
        truncated - 1
    } else {
        truncated
    }
}

/// Horizontal chunk coordinates (16-block columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

/// An immutable world position with orientation.
///
/// Coordinates are doubles, orientation is float degrees, and the world is
/// identified by an opaque string extracted by the host server's world
/// accessor. Block and chunk coordinates are derived on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    x: f64,
    y: f64,
    z: f64,
    yaw: f32,
    pitch: f32,
    world_id: String,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64, yaw: f32, pitch: f32, world_id: impl Into<String>) -> Self {
        Self {
            x,
            y,
            z,
            yaw,
            pitch,
            world_id: world_id.into(),
        }
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Yaw in degrees.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[must_use]
    pub fn world_id(&self) -> &str {
        &self.world_id
    }

    #[must_use]
    pub fn block_x(&self) -> i32 {
        floor(self.x)
    }

    #[must_use]
    pub fn block_y(&self) -> i32 {
        floor(self.y)
    }

    #[must_use]
    pub fn block_z(&self) -> i32 {
        floor(self.z)
    }

    #[must_use]
    pub fn chunk_x(&self) -> i32 {
        self.block_x() >> 4
    }

    /// Vertical chunk section index (16x256 slabs in legacy column terms).
    #[must_use]
    pub fn chunk_y(&self) -> i32 {
        self.block_y() >> 8
    }

    #[must_use]
    pub fn chunk_z(&self) -> i32 {
        self.block_z() >> 4
    }

    #[must_use]
    pub fn chunk(&self) -> ChunkPos {
        ChunkPos {
            x: self.chunk_x(),
            z: self.chunk_z(),
        }
    }

    /// Squared Euclidean distance on (x, y, z). World ids are not compared.
    #[must_use]
    pub fn distance_sq(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Same world id as `other`.
    #[must_use]
    pub fn same_world(&self, other: &Self) -> bool {
        self.world_id == other.world_id
    }

    /// Same x/y/z coordinates as `other` (exact comparison).
    #[must_use]
    pub fn same_coords(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }

    /// Same yaw and pitch as `other` (exact comparison).
    #[must_use]
    pub fn same_orientation(&self, other: &Self) -> bool {
        self.yaw == other.yaw && self.pitch == other.pitch
    }

    /// Copy of this position with a different orientation.
    #[must_use]
    pub fn with_orientation(&self, yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch,
            ..self.clone()
        }
    }
}
