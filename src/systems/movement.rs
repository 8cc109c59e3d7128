//! Velocity integration and field clamping.

use bevy_ecs::system::{Query, Res};

use crate::constants::{BOUNDING_RADIUS, FIELD_LENGTH, FIELD_WIDTH};
use crate::systems::components::{DeltaTime, MaxSpeed, Orientation, Position, Velocity};

/// Integrates velocity into position for every mover, clamps the result to
/// the playable field, and keeps orientation aligned with the heading.
///
/// Stationary entities are left untouched, which also keeps off-field
/// fixtures (the doll stands behind the finish wall) out of the clamp.
pub fn movement_system(
    time: Res<DeltaTime>,
    mut movers: Query<(&mut Position, &mut Velocity, &mut Orientation, Option<&MaxSpeed>)>,
) {
    let half_x = FIELD_WIDTH / 2.0 - BOUNDING_RADIUS;
    let half_z = FIELD_LENGTH / 2.0 - BOUNDING_RADIUS;

    for (mut position, mut velocity, mut orientation, max_speed) in movers.iter_mut() {
        if velocity.0.length_squared() == 0.0 {
            continue;
        }

        if let Some(max_speed) = max_speed {
            velocity.0 = velocity.0.clamp_length_max(max_speed.0);
        }

        position.0 += velocity.0 * time.seconds;
        position.0.x = position.0.x.clamp(-half_x, half_x);
        position.0.z = position.0.z.clamp(-half_z, half_z);

        orientation.facing = velocity.0.normalize_or_zero();
    }
}
