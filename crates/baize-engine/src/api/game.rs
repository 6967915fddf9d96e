use glam::Vec2;
use serde::Deserialize;

use crate::api::types::{EntityId, GameEvent};
use crate::components::entity::Entity;
use crate::core::physics::{BodyDesc, ColliderMaterial, CollisionPair, PhysicsWorld};
use crate::core::scene::Scene;
use crate::core::time::Clock;
use crate::input::queue::InputQueue;
use crate::renderer::frame::Frame;

/// Configuration for the engine, provided by the game.
///
/// Every field has a default, so a partial JSON document only overrides
/// what it names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Multiplier applied to `fixed_dt` for physics integration only.
    /// Values below 1.0 slow the world down for more accurate contacts.
    pub time_scale: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of game events per tick (default: 32).
    pub max_events: usize,
    /// Gravity vector for physics simulation. Default: zero (top-down).
    pub gravity: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            time_scale: 1.0,
            world_width: 800.0,
            world_height: 600.0,
            max_events: 32,
            gravity: Vec2::ZERO,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Timestep handed to the physics integrator.
    pub fn physics_dt(&self) -> f32 {
        self.fixed_dt * self.time_scale
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. Physics has already been advanced for this tick
    /// when this runs, so `ctx.collisions()` holds the contacts it produced.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub events: Vec<GameEvent>,
    pub frame: Frame,
    pub clock: Clock,
    /// When set, `step` leaves bodies where they are but time still passes.
    pub physics_paused: bool,
    fixed_dt: f32,
    max_events: usize,
    next_id: u32,
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.physics_dt());
        Self {
            scene: Scene::new(),
            physics,
            events: Vec::new(),
            frame: Frame::new(),
            clock: Clock::new(),
            physics_paused: false,
            fixed_dt: config.fixed_dt,
            max_events: config.max_events,
            next_id: 1,
            collision_events: Vec::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Current simulation time in seconds.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Emit a game event to be forwarded to the host.
    /// Events past the configured capacity are dropped.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() < self.max_events {
            self.events.push(event);
        } else {
            log::debug!("event queue full, dropping kind {}", event.kind);
        }
    }

    /// Clear per-tick transient data (events, draw list).
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
        self.frame.clear();
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Returns the EntityId.
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity
            .with_pos(desc.position)
            .with_rotation(desc.rotation)
            .with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity, cleaning up its physics body if present.
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.despawn(id) {
            if let Some(body) = &entity.body {
                self.physics.remove_body(body);
            }
        }
    }


    /// Set the linear velocity of an entity's physics body.
    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        if let Some(body) = self.body_of(id) {
            self.physics.set_velocity(&body, vel);
        }
    }

    /// Get the linear velocity of an entity's physics body.
    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.body_of(id)
            .map(|body| self.physics.velocity(&body))
            .unwrap_or(Vec2::ZERO)
    }

    /// Last synced position of an entity.
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.scene.get(id).map(|e| e.pos)
    }

    /// Move an entity's body and its mirrored pose immediately.
    pub fn teleport(&mut self, id: EntityId, pos: Vec2) {
        if let Some(body) = self.body_of(id) {
            self.physics.set_position(&body, pos);
        }
        if let Some(entity) = self.scene.get_mut(id) {
            entity.pos = pos;
        }
    }

    /// Whether the bodies of two entities are in active contact.
    pub fn collides(&self, a: EntityId, b: EntityId) -> bool {
        match (self.body_of(a), self.body_of(b)) {
            (Some(a), Some(b)) => self.physics.collides(&a, &b),
            _ => false,
        }
    }

    /// Physics handle of an entity, if it has one.
    pub fn body_of(&self, id: EntityId) -> Option<crate::core::physics::PhysicsBody> {
        self.scene.get(id).and_then(|e| e.body)
    }

    /// Get collision events from the most recent physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Advance one tick: step physics (unless paused), sync poses back to
    /// entities, then advance the clock by the unscaled fixed dt.
    pub fn step(&mut self) {
        self.collision_events.clear();
        if !self.physics_paused {
            self.physics.step_into(&mut self.collision_events);

            // Sync Rapier body positions back to entity positions
            for entity in self.scene.iter_mut() {
                if let Some(body) = &entity.body {
                    let (pos, rot) = self.physics.body_position(body);
                    entity.pos = pos;
                    entity.rotation = rot;
                    entity.velocity = self.physics.velocity(body);
                }
            }
        }
        self.clock.advance(self.fixed_dt);
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
