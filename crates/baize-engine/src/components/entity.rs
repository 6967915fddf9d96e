use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::physics::PhysicsBody;

/// A simulated object: a pose mirrored from physics plus its body handle.
/// Game-side meaning (which ball, which cushion) lives in the game, keyed by `id`.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Position in world space, synced from physics after every step.
    pub pos: Vec2,
    /// Rotation in radians, synced from physics after every step.
    pub rotation: f32,
    /// Linear velocity, synced from physics after every step.
    pub velocity: Vec2,
    /// Physics body (entities without a body are never synced).
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Current speed (length of the synced velocity).
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
