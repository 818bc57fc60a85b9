mod error;
mod loader;
mod timers;

pub use error::*;
pub use loader::*;
pub use timers::*;
