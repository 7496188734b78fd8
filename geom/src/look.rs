//! Look-at orientation math.

use crate::Position;

/// Yaw/pitch in degrees that make an entity at `from` face `target`.
///
/// Bearing follows the game's south-positive axis convention: south is yaw 0,
/// west 90, north 180, east -90. Pitch is negative looking up, positive
/// looking down.
#[must_use]
pub fn look_at(from: &Position, target: &Position) -> (f32, f32) {
    let dx = target.x() - from.x();
    let dy = target.y() - from.y();
    let dz = target.z() - from.z();

    let dist_xz = (dx * dx + dz * dz).sqrt();
    let dist = (dist_xz * dist_xz + dy * dy).sqrt();
    if dist == 0.0 {
        return (0.0, 0.0);
    }
    if dist_xz == 0.0 {
        // straight up or down, bearing is meaningless
        let pitch = if dy > 0.0 { -90.0 } else { 90.0 };
        return (0.0, pitch);
    }

    let mut yaw = (dx / dist_xz).acos().to_degrees();
    let pitch = (dy / dist).acos().to_degrees() - 90.0;
    if dz < 0.0 {
        yaw += (180.0 - yaw).abs() * 2.0;
    }

    #[allow(clippy::cast_possible_truncation)]
    {
        ((yaw - 90.0) as f32, pitch as f32)
    }
}
