// extensions/mod.rs
//
// Optional extension modules for baize-engine.
// Decoupled from Entity/Scene; games call them directly.

pub mod easing;

pub use easing::{Easing, lerp, inverse_lerp, remap_clamped};
