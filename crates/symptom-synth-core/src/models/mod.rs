//! Domain models for the symptom-synth system.

mod disease;
mod language;
mod sample;

pub use disease::*;
pub use language::*;
pub use sample::*;
