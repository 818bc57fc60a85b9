mod factory;
mod params;
mod scheduler;
mod strategy;
mod system;

pub use factory::*;
pub use params::*;
pub use scheduler::*;
pub use strategy::*;
pub use system::*;

use thiserror::Error;

/// Why a spawn attempt produced nothing
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum SpawnError {
	#[error("no spawn point available")]
	NoSpawnPoint,

	#[error("no entity descriptors to build from")]
	NoDescriptor,
}
