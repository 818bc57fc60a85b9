use thiserror::Error;

/// Rejected configuration values, reported when a timer, jump controller, or spawn
/// scheduler is constructed.
#[derive(Debug, Error, Copy, Clone, PartialEq)]
pub enum ConfigError {
	#[error("{timer} duration must be positive and finite (got {value})")]
	InvalidDuration { timer: &'static str, value: f32 },

	#[error("{name} is out of range (got {value})")]
	InvalidParameter { name: &'static str, value: f32 },
}
