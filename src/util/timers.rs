use crate::util::ConfigError;

/// Remaining time at or below this many seconds counts as expired.
/// Keeps deltas like `0.1` (which are not exact in binary) from leaving a
/// tiny positive residue that would hold a countdown open for an extra frame.
pub const EXPIRY_TOLERANCE: f32 = 1e-5;

/// A lifecycle transition reported by a [Timer].
///
/// Timers don't hold callbacks; whoever owns the timer receives these values
/// from [Timer::start], [Timer::stop] and [Timer::tick] and reacts to them.
#[must_use]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TimerEvent {
	Started,
	Stopped,
}

/// State shared by every timer variant.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerClock {
	initial: f32,
	time: f32,
	running: bool,
}

impl TimerClock {
	fn new(initial: f32) -> Result<Self, ConfigError> {
		validate_duration("timer", initial)?;
		Ok(Self {
			initial,
			time: 0.0,
			running: false,
		})
	}
}

/// Check that `value` is usable as a timer duration, naming it `timer` in the error
pub fn validate_duration(timer: &'static str, value: f32) -> Result<(), ConfigError> {
	if value.is_finite() && value > 0.0 {
		Ok(())
	} else {
		Err(ConfigError::InvalidDuration { timer, value })
	}
}

/// Common start/stop/progress contract for [CountDownTimer] and [StopWatchTimer].
///
/// Implementors supply access to their [TimerClock] and the direction time flows in
/// [Timer::tick]; everything else is shared.
pub trait Timer {
	fn clock(&self) -> &TimerClock;

	fn clock_mut(&mut self) -> &mut TimerClock;

	/// Advance the timer by `delta` seconds. Must be called once per simulation step.
	fn tick(&mut self, delta: f32) -> Option<TimerEvent>;

	/// Reset the clock to its initial duration and set it running.
	/// The clock is reset on every call, but [TimerEvent::Started] is only
	/// reported when the timer wasn't already running.
	fn start(&mut self) -> Option<TimerEvent> {
		let clock = self.clock_mut();
		clock.time = clock.initial;
		if clock.running {
			None
		} else {
			clock.running = true;
			Some(TimerEvent::Started)
		}
	}

	/// Stop a running timer. Stopping a stopped timer reports nothing.
	fn stop(&mut self) -> Option<TimerEvent> {
		let clock = self.clock_mut();
		if clock.running {
			clock.running = false;
			Some(TimerEvent::Stopped)
		} else {
			None
		}
	}

	/// Suspend the timer without resetting it or reporting a transition
	fn pause(&mut self) {
		self.clock_mut().running = false;
	}

	/// Continue a paused timer without resetting it or reporting a transition
	fn resume(&mut self) {
		self.clock_mut().running = true;
	}

	fn is_running(&self) -> bool {
		self.clock().running
	}

	/// Current clock value in seconds
	fn time(&self) -> f32 {
		self.clock().time
	}

	/// The duration the timer was configured with
	fn initial(&self) -> f32 {
		self.clock().initial
	}

	/// `time / initial`. For a countdown this runs from 1.0 at start to 0.0 at expiry;
	/// a stopwatch grows past 1.0 without bound.
	fn progress(&self) -> f32 {
		let clock = self.clock();
		clock.time / clock.initial
	}
}

/// Counts down from its initial duration and stops itself on reaching zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CountDownTimer(TimerClock);

impl CountDownTimer {
	pub fn new(duration: f32) -> Result<Self, ConfigError> {
		TimerClock::new(duration).map(Self)
	}

	pub fn is_finished(&self) -> bool {
		self.0.time <= 0.0
	}

	/// Rewind to the initial duration without changing whether the timer is running
	pub fn reset(&mut self) {
		self.0.time = self.0.initial;
	}

	/// Change the initial duration, then rewind to it
	pub fn reset_to(&mut self, duration: f32) -> Result<(), ConfigError> {
		validate_duration("timer", duration)?;
		self.0.initial = duration;
		self.reset();
		Ok(())
	}
}

impl Timer for CountDownTimer {
	fn clock(&self) -> &TimerClock {
		&self.0
	}

	fn clock_mut(&mut self) -> &mut TimerClock {
		&mut self.0
	}

	fn tick(&mut self, delta: f32) -> Option<TimerEvent> {
		if self.0.running && self.0.time > 0.0 {
			self.0.time -= delta;
		}
		if self.0.running && self.0.time <= EXPIRY_TOLERANCE {
			self.0.time = 0.0;
			self.stop()
		} else {
			None
		}
	}
}

/// Counts up from its initial duration for as long as it runs, with no upper bound.
/// Use [StopWatchTimer::reset] after starting to measure from zero.
#[derive(Debug, Clone, PartialEq)]
pub struct StopWatchTimer(TimerClock);

impl StopWatchTimer {
	pub fn new(reference: f32) -> Result<Self, ConfigError> {
		TimerClock::new(reference).map(Self)
	}

	/// Zero the clock without changing whether the stopwatch is running
	pub fn reset(&mut self) {
		self.0.time = 0.0;
	}
}

impl Timer for StopWatchTimer {
	fn clock(&self) -> &TimerClock {
		&self.0
	}

	fn clock_mut(&mut self) -> &mut TimerClock {
		&mut self.0
	}

	fn tick(&mut self, delta: f32) -> Option<TimerEvent> {
		if self.0.running {
			self.0.time += delta;
		}
		None
	}
}
