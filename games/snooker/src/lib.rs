use wasm_bindgen::prelude::*;
use baize_engine::*;

pub mod balls;
pub mod config;
pub mod cue;
pub mod game;
pub mod messages;
pub mod registry;
pub mod score;
pub mod table;
pub mod timer;

pub use game::SnookerGame;

baize_web::export_game!(SnookerGame, "snooker");
