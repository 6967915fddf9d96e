pub mod api;
pub mod core;
pub mod components;
pub mod renderer;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, GameEvent, events_as_floats};
pub use components::entity::Entity;
pub use core::scene::Scene;
pub use core::time::{Clock, Cooldown, Deadline, FixedTimestep};
pub use renderer::frame::{DrawCommand, Frame, Rgba};
pub use input::queue::{keys, InputEvent, InputQueue};

pub use core::physics::{
    trapezoid_vertices, BodyDesc, BodyType, ColliderDesc, ColliderMaterial, CollisionFilter,
    CollisionPair, PhysicsBody, PhysicsWorld,
};

pub use extensions::{inverse_lerp, lerp, remap_clamped, Easing};
