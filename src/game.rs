//! Game construction and the per-tick schedule.
//!
//! Orchestrates all systems through a centralized `World` containing
//! entities, components and resources, while a `Schedule` defines the
//! deterministic execution order of one simulation tick.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::world::World;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::animation::{animation_system, AnimationSet, Clip};
use crate::audio::{audio_system, AudioEvent, AudioState};
use crate::constants::{self, clip};
use crate::error::GameResult;
use crate::fsm::StateMachine;
use crate::session::{session_system, start_session, SessionContext, SessionEvent, SessionPhase};
use crate::systems::{
    assign_behavior, doll_system, finish_line_system, movement_system, player_control_system, player_state_system,
    steering_system, DeltaTime, Doll, DollState, FinishLine, InputFlags, InputState, MaxSpeed, Name, Npc,
    NpcBundle, Orientation, PlayerControlled, PlayerCtx, PlayerState, Position, Runner, RunnerBundle, SessionRng,
    Soldier, SoldierBundle, Steering, Velocity,
};

/// System sets partitioning one tick into deterministic stages.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Clock advance and input application.
    Input,
    /// Entity updates: steering, movement, state machines, the doll's
    /// sweeps and the finish trigger.
    Update,
    /// Animation playback and audio cues.
    Respond,
}

/// Construction parameters for one session.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    /// Number of AI runners to spawn.
    pub npc_count: usize,
    /// RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            npc_count: constants::NPC_COUNT,
            seed: None,
        }
    }
}

/// Core game state built on the Bevy ECS architecture.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

/// Per-state tally of the runner population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateTally {
    pub idle: usize,
    pub walk: usize,
    pub run: usize,
    pub dance: usize,
    pub dead: usize,
}

impl Game {
    /// Builds the world: resources, event registry, the system schedule,
    /// and the full entity population. Entities are only added once their
    /// state machines and animation sets are fully resolved, so the first
    /// tick never observes a partially-initialized entity.
    pub fn new(config: GameConfig) -> GameResult<Game> {
        info!(npc_count = config.npc_count, seed = ?config.seed, "Starting game initialization");

        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);
        Self::configure_schedule(&mut schedule);

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let mut session = SessionContext::default();

        debug!("Spawning player entity");
        world.spawn((
            Self::runner_bundle("player".into(), constants::PLAYER_SPAWN, constants::WALK_MAX_SPEED)?,
            PlayerControlled,
        ));

        debug!("Spawning AI runners");
        for index in 0..config.npc_count {
            let spawn = Vec3::new(
                rng.random_range(constants::NPC_SPAWN_X_MIN..=constants::NPC_SPAWN_X_MAX) as f32,
                0.0,
                rng.random_range(constants::NPC_SPAWN_Z_MIN..=constants::NPC_SPAWN_Z_MAX) as f32,
            );
            let max_speed = rng.random_range(constants::NPC_SPEED_MIN..constants::NPC_SPEED_MAX);
            let behavior = assign_behavior(&mut rng, &mut session, spawn);
            world.spawn(NpcBundle {
                runner: Self::runner_bundle(format!("npc-{index}"), spawn, max_speed)?,
                npc: Npc,
                steering: Steering::new(behavior),
            });
        }

        debug!("Spawning soldiers and doll");
        for (index, x) in [-constants::SOLDIER_OFFSET_X, constants::SOLDIER_OFFSET_X].into_iter().enumerate() {
            world.spawn(Self::soldier_bundle(
                format!("soldier-{index}"),
                Vec3::new(x, 0.0, constants::SOLDIER_Z),
            )?);
        }
        Self::spawn_doll(&mut world)?;

        world.insert_resource(session);
        world.insert_resource(SessionRng(rng));
        world.insert_resource(DeltaTime::default());
        world.insert_resource(InputState::default());
        world.insert_resource(AudioState::default());
        world.insert_resource(FinishLine::default());

        info!("Game initialization completed");
        Ok(Game { world, schedule })
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<AudioEvent>(world);
        EventRegistry::register_event::<SessionEvent>(world);
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule.configure_sets((GameplaySet::Input, GameplaySet::Update, GameplaySet::Respond).chain());
        schedule.add_systems((
            (session_system, player_control_system).chain().in_set(GameplaySet::Input),
            (
                steering_system,
                movement_system,
                player_state_system,
                doll_system,
                finish_line_system,
            )
                .chain()
                .in_set(GameplaySet::Update),
            (animation_system, audio_system).chain().in_set(GameplaySet::Respond),
        ));
    }

    /// The full runner clip set, durations matching the loaded assets.
    fn runner_animations() -> AnimationSet {
        AnimationSet::new([
            (PlayerState::Idle, Clip::new(clip::IDLE)),
            (PlayerState::Walk, Clip::new(clip::WALK)),
            (PlayerState::Run, Clip::new(clip::RUN)),
            (PlayerState::Dance, Clip::new(clip::DANCE)),
            (PlayerState::Dead, Clip::new(clip::DEAD)),
        ])
    }

    fn runner_bundle(name: String, position: Vec3, max_speed: f32) -> GameResult<RunnerBundle> {
        let mut velocity = Velocity::default();
        let mut orientation = Orientation::default();
        let mut animations = Self::runner_animations();
        animations.validate(&PlayerState::iter().collect::<Vec<_>>())?;

        let mut machine = StateMachine::new();
        for state in PlayerState::iter() {
            machine.add(state)?;
        }
        let mut ctx = PlayerCtx {
            position,
            velocity: &mut velocity,
            orientation: &mut orientation,
            animations: &mut animations,
            input: InputFlags::empty(),
            controlled: false,
        };
        machine.change_to(PlayerState::Idle, &mut ctx)?;

        Ok(RunnerBundle {
            runner: Runner,
            name: Name(name),
            position: Position(position),
            velocity,
            max_speed: MaxSpeed(max_speed),
            orientation,
            machine,
            animations,
        })
    }

    /// Soldiers only ever idle; their machine registers a single state and
    /// their animation set carries a single clip.
    fn soldier_bundle(name: String, position: Vec3) -> GameResult<SoldierBundle> {
        let mut velocity = Velocity::default();
        let mut orientation = Orientation::default();
        let mut animations = AnimationSet::new([(PlayerState::Idle, Clip::new(clip::IDLE))]);
        animations.validate(&[PlayerState::Idle])?;

        let mut machine = StateMachine::new();
        machine.add(PlayerState::Idle)?;
        let mut ctx = PlayerCtx {
            position,
            velocity: &mut velocity,
            orientation: &mut orientation,
            animations: &mut animations,
            input: InputFlags::empty(),
            controlled: false,
        };
        machine.change_to(PlayerState::Idle, &mut ctx)?;

        Ok(SoldierBundle {
            soldier: Soldier,
            name: Name(name),
            position: Position(position),
            velocity,
            orientation,
            machine,
            animations,
        })
    }

    /// The doll stands behind the finish wall, facing down-field. Its
    /// machine stays empty-handed until the session starts and the first
    /// green light is entered.
    fn spawn_doll(world: &mut World) -> GameResult<()> {
        let mut machine: StateMachine<DollState> = StateMachine::new();
        for state in DollState::iter() {
            machine.add(state)?;
        }
        let mut orientation = Orientation::default();
        orientation.face_toward(constants::DOLL_POSITION, constants::DOLL_GREEN_FOCUS);

        world.spawn((
            Doll,
            Name("doll".into()),
            Position(constants::DOLL_POSITION),
            Velocity::default(),
            orientation,
            machine,
        ));
        Ok(())
    }

    /// Starts the session: countdown begins, strategies activate, the doll
    /// shows green.
    pub fn start(&mut self) -> GameResult<()> {
        start_session(&mut self.world)
    }

    /// Advances the simulation by one tick of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.world.resource_mut::<DeltaTime>().seconds = dt;
        self.schedule.run(&mut self.world);
        self.world.resource_mut::<Events<AudioEvent>>().update();
        self.world.resource_mut::<Events<SessionEvent>>().update();
    }

    pub fn session(&self) -> &SessionContext {
        self.world.resource::<SessionContext>()
    }

    pub fn phase(&self) -> SessionPhase {
        self.session().phase
    }

    /// Entity lookup by name.
    pub fn find_by_name(&mut self, name: &str) -> Option<Entity> {
        self.world
            .query::<(Entity, &Name)>()
            .iter(&self.world)
            .find(|(_, candidate)| candidate.0 == name)
            .map(|(entity, _)| entity)
    }

    /// Counts the runner population by current state.
    pub fn tally(&mut self) -> StateTally {
        let mut tally = StateTally::default();
        let mut runners = self.world.query_filtered::<&StateMachine<PlayerState>, With<Runner>>();
        for machine in runners.iter(&self.world) {
            match machine.current() {
                Some(PlayerState::Idle) => tally.idle += 1,
                Some(PlayerState::Walk) => tally.walk += 1,
                Some(PlayerState::Run) => tally.run += 1,
                Some(PlayerState::Dance) => tally.dance += 1,
                Some(PlayerState::Dead) => tally.dead += 1,
                None => {}
            }
        }
        tally
    }
}
