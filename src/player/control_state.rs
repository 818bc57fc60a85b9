use bevy::log::debug;
use bevy::math::Vec2;
use bevy::prelude::Component;
use crate::player::JumpParams;
use crate::util::{ConfigError, CountDownTimer, StopWatchTimer, Timer, TimerEvent};

/// Jump timer progress above which the launch velocity is applied outright.
/// The jump timer counts down, so this is the first 10% of the jump's elapsed time.
pub const LAUNCH_POINT: f32 = 0.9;

#[derive(Component, Default)]
pub struct PlayerControlState {
    /// jump state machine, built once the player's params have loaded
    pub jump: Option<JumpController>,

    /// set when the loaded params were rejected, so we don't retry every frame
    pub params_error: Option<ConfigError>,

    /// jump button edges (`true` = pressed) sampled since the last fixed step, oldest first
    pub jump_inputs: Vec<bool>,

    /// ground contact as reported by the character controller on the previous step
    pub grounded: bool,

    /// velocity from directional input and the jump controller
    pub own_velocity: Vec2,

    /// height the player jumped from, used to report the apex of the jump
    pub y_when_jumped: Option<f32>,
}

/// A momentary classification of the jump state machine, recomputed every step
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum JumpPhase {
    /// on the ground and not jumping
    Grounded,

    /// early in the jump, where the launch velocity is applied
    Launching,

    /// jump still held, velocity grows by a tapering amount
    Rising,

    /// airborne with no active jump, gravity applies
    Falling,
}

/// Computes the player's vertical velocity from ground state, jump input, and
/// two timers: one bounding how long a jump can be held, and a cooldown that
/// starts whenever that jump ends.
#[derive(Debug, Clone)]
pub struct JumpController {
    params: JumpParams,
    jump_timer: CountDownTimer,
    cooldown_timer: CountDownTimer,
    /// time since leaving the ground, frozen on landing
    air_timer: StopWatchTimer,
    velocity: f32,
}

impl JumpController {
    pub fn new(params: &JumpParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params: *params,
            jump_timer: CountDownTimer::new(params.duration)?,
            cooldown_timer: CountDownTimer::new(params.cooldown)?,
            air_timer: StopWatchTimer::new(params.duration)?,
            velocity: 0.0,
        })
    }

    /// Vertical speed needed to reach `max_height` against `gravity`: `v = sqrt(2gh)`
    pub fn launch_velocity(max_height: f32, gravity: f32) -> f32 {
        (2.0 * max_height * gravity.abs()).sqrt()
    }

    /// Handle an edge of the jump button.
    ///
    /// A press starts a jump only when grounded, not already jumping, and not on cooldown.
    /// A release cuts a running jump short. Returns whether the request changed anything;
    /// requests that don't apply are ignored.
    pub fn request_jump(&mut self, pressed: bool, grounded: bool) -> bool {
        if pressed {
            if self.jump_timer.is_running() || self.cooldown_timer.is_running() || !grounded {
                debug!(
                    "ignoring jump (jumping: {}, cooling down: {}, grounded: {})",
                    self.jump_timer.is_running(),
                    self.cooldown_timer.is_running(),
                    grounded
                );
                return false;
            }
            let event = self.jump_timer.start();
            self.on_jump_timer(event);
            true
        } else {
            let event = self.jump_timer.stop();
            let stopped = event.is_some();
            self.on_jump_timer(event);
            stopped
        }
    }

    /// End the current jump, if any, as if its timer had run out
    pub fn cancel_jump(&mut self) {
        let event = self.jump_timer.stop();
        self.on_jump_timer(event);
    }

    /// Advance the timers by one fixed step and compute the new vertical velocity.
    /// `gravity` is the world's vertical acceleration (negative is down).
    pub fn step(&mut self, grounded: bool, gravity: f32, delta: f32) -> f32 {
        if grounded {
            if self.air_timer.stop().is_some() {
                debug!("landed after {}s in the air", self.air_timer.time());
            }
        } else if !self.air_timer.is_running() {
            let _ = self.air_timer.start();
            self.air_timer.reset();
        }
        let _ = self.air_timer.tick(delta);

        // tick in the same order the cooldown gets started, so a cooldown started
        // by an expiring jump is advanced within this step
        let event = self.jump_timer.tick(delta);
        self.on_jump_timer(event);
        if self.cooldown_timer.tick(delta).is_some() {
            debug!("jump cooldown finished");
        }

        if !self.jump_timer.is_running() && grounded {
            self.velocity = 0.0;
            let event = self.jump_timer.stop();
            self.on_jump_timer(event);
            return self.velocity;
        }

        if self.jump_timer.is_running() {
            let progress = self.jump_timer.progress();
            if progress > LAUNCH_POINT {
                self.velocity = Self::launch_velocity(self.params.max_height, gravity);
            } else {
                self.velocity += (1.0 - progress) * self.params.force * delta;
            }
        } else {
            self.velocity += gravity * self.params.gravity_multiplier * delta;
        }

        self.velocity
    }

    fn on_jump_timer(&mut self, event: Option<TimerEvent>) {
        match event {
            Some(TimerEvent::Started) => debug!("jump started"),
            Some(TimerEvent::Stopped) => {
                debug!("jump ended at progress {}", self.jump_timer.progress());
                if self.cooldown_timer.start().is_some() {
                    debug!("jump cooldown started");
                }
            }
            None => {}
        }
    }

    pub fn phase(&self, grounded: bool) -> JumpPhase {
        if self.jump_timer.is_running() {
            if self.jump_timer.progress() > LAUNCH_POINT {
                JumpPhase::Launching
            } else {
                JumpPhase::Rising
            }
        } else if grounded {
            JumpPhase::Grounded
        } else {
            JumpPhase::Falling
        }
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_jumping(&self) -> bool {
        self.jump_timer.is_running()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_timer.is_running()
    }

    pub fn jump_progress(&self) -> f32 {
        self.jump_timer.progress()
    }

    /// Seconds spent airborne, either so far or during the most recent flight
    pub fn air_time(&self) -> f32 {
        self.air_timer.time()
    }
}
