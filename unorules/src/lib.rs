pub mod card;
pub mod clock;
pub mod constants;
pub mod deck;
pub mod engine;
pub mod error;
pub mod player;
pub mod policy;
pub mod queue;
pub mod rng;
pub mod rules;
pub mod summary;
pub mod turn;

pub use engine::GameEngine;
pub use error::{Result, UnoError};
