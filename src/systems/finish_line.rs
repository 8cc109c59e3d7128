//! The finish-line trigger: a static region that turns arriving runners
//! into dancers, exactly once each.

use std::collections::HashSet;

use bevy_ecs::entity::Entity;
use bevy_ecs::query::{With, Without};
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Query, ResMut};
use glam::Vec3;
use tracing::{debug, error};

use crate::constants::{BOUNDING_RADIUS, FINISH_CENTER, FINISH_SIZE};
use crate::fsm::StateMachine;
use crate::systems::behavior::Steering;
use crate::systems::components::{Doll, Name, Orientation, Position, Runner, Velocity};
use crate::systems::input::InputFlags;
use crate::systems::player::{PlayerCtx, PlayerState};

/// A static axis-aligned trigger volume.
#[derive(Debug, Clone, Copy)]
pub struct TriggerRegion {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl TriggerRegion {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            half_extents: size / 2.0,
        }
    }

    /// Sphere-versus-box contact test, the same touch rule the engine's
    /// rectangular trigger regions use.
    pub fn touches(&self, point: Vec3, radius: f32) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half_extents.x + radius
            && offset.y <= self.half_extents.y + radius
            && offset.z <= self.half_extents.z + radius
    }
}

/// The finish line plus its per-entity "already fired" cache. Entries are
/// never removed; once processed, a runner can overlap forever without
/// re-triggering.
#[derive(Resource, Debug)]
pub struct FinishLine {
    pub region: TriggerRegion,
    fired: HashSet<Entity>,
}

impl Default for FinishLine {
    fn default() -> Self {
        Self {
            region: TriggerRegion::new(FINISH_CENTER, FINISH_SIZE),
            fired: HashSet::new(),
        }
    }
}

impl FinishLine {
    pub fn has_fired(&self, entity: Entity) -> bool {
        self.fired.contains(&entity)
    }
}

/// Checks every uncached runner for contact with the finish region and
/// moves arrivals into DANCE, clearing AI steering.
pub fn finish_line_system(
    mut finish: ResMut<FinishLine>,
    mut runners: Query<
        (
            Entity,
            &Name,
            &mut StateMachine<PlayerState>,
            &mut Velocity,
            &mut Orientation,
            &mut crate::animation::AnimationSet,
            &Position,
            Option<&mut Steering>,
        ),
        (With<Runner>, Without<Doll>),
    >,
) {
    for (entity, name, mut machine, mut velocity, mut orientation, mut animations, position, steering) in runners.iter_mut() {
        if finish.has_fired(entity) || !finish.region.touches(position.0, BOUNDING_RADIUS) {
            continue;
        }

        if !machine.is_in(PlayerState::Dance) {
            let mut ctx = PlayerCtx {
                position: position.0,
                velocity: &mut *velocity,
                orientation: &mut *orientation,
                animations: &mut *animations,
                input: InputFlags::empty(),
                controlled: false,
            };
            if let Err(err) = machine.change_to(PlayerState::Dance, &mut ctx) {
                error!(%err, name = %name.0, "Finish transition failed");
                continue;
            }
            if let Some(mut steering) = steering {
                steering.clear();
            }
            finish.fired.insert(entity);
            debug!(name = %name.0, "Runner crossed the finish line");
        }
    }
}
