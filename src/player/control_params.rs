use crate::util::{ConfigError, RonAsset, validate_duration};
use bevy::prelude::{Asset, TypePath};
use serde::Deserialize;

#[derive(Asset, Copy, Clone, Debug, Deserialize, TypePath)]
pub struct PlayerControlParams {
	/// horizontal speed (units per second) while a direction is held
	pub move_speed: f32,

	/// vertical acceleration of the world, in units per second squared (negative is down)
	pub gravity: f32,

	pub jump: JumpParams,
}

impl RonAsset for PlayerControlParams {
	const EXTENSIONS: &'static [&'static str] = &["player.ron"];
}

/// Tuning for [JumpController](crate::player::JumpController). Durations are in seconds.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
pub struct JumpParams {
	/// upward acceleration applied while the jump is held, tapering as the jump timer runs out
	pub force: f32,

	/// how long the jump button can keep the player rising
	pub duration: f32,

	/// time after a jump ends before another jump is accepted
	pub cooldown: f32,

	/// apex height used to compute the launch velocity
	pub max_height: f32,

	/// scales gravity while falling
	pub gravity_multiplier: f32,
}

impl JumpParams {
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_duration("jump", self.duration)?;
		validate_duration("jump cooldown", self.cooldown)?;
		if !self.force.is_finite() {
			return Err(ConfigError::InvalidParameter {
				name: "jump force",
				value: self.force,
			});
		}
		if !(self.max_height.is_finite() && self.max_height >= 0.0) {
			return Err(ConfigError::InvalidParameter {
				name: "jump max height",
				value: self.max_height,
			});
		}
		if !(self.gravity_multiplier.is_finite() && self.gravity_multiplier >= 0.0) {
			return Err(ConfigError::InvalidParameter {
				name: "gravity multiplier",
				value: self.gravity_multiplier,
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params() -> JumpParams {
		JumpParams {
			force: 10.0,
			duration: 0.5,
			cooldown: 0.25,
			max_height: 2.0,
			gravity_multiplier: 3.0,
		}
	}

	#[test]
	fn parses_player_ron() {
		let src = "(
			move_speed: 40.0,
			gravity: -98.0,
			jump: (
				force: 10.0,
				duration: 0.5,
				cooldown: 0.25,
				max_height: 2.0,
				gravity_multiplier: 3.0,
			),
		)";
		let parsed: PlayerControlParams = ron::de::from_str(src).unwrap();
		assert_eq!(parsed.move_speed, 40.0);
		assert_eq!(parsed.gravity, -98.0);
		assert_eq!(parsed.jump, params());
	}

	#[test]
	fn validate_accepts_sane_params() {
		assert_eq!(params().validate(), Ok(()));
	}

	#[test]
	fn validate_rejects_bad_durations_and_ranges() {
		let zero_duration = JumpParams { duration: 0.0, ..params() };
		assert!(matches!(
			zero_duration.validate(),
			Err(ConfigError::InvalidDuration { timer: "jump", .. })
		));

		let zero_cooldown = JumpParams { cooldown: 0.0, ..params() };
		assert!(matches!(
			zero_cooldown.validate(),
			Err(ConfigError::InvalidDuration { timer: "jump cooldown", .. })
		));

		let negative_height = JumpParams { max_height: -1.0, ..params() };
		assert!(matches!(
			negative_height.validate(),
			Err(ConfigError::InvalidParameter { name: "jump max height", .. })
		));

		let nan_force = JumpParams { force: f32::NAN, ..params() };
		assert!(nan_force.validate().is_err());
	}
}
