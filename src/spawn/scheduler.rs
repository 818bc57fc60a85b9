use crate::spawn::{EntityFactory, SpawnError, SpawnPointStrategy};
use crate::util::{ConfigError, CountDownTimer, Timer, TimerEvent, validate_duration};
use bevy::log::{debug, info, warn};

/// Spawns one entity every `interval` seconds until it has filled `total_slots`,
/// then stops for good.
///
/// Where entities appear is up to the [SpawnPointStrategy], and what they are is up to
/// the [EntityFactory]. A failed spawn leaves the scheduler idle but usable: calling
/// [SpawnScheduler::start] again resumes the schedule.
pub struct SpawnScheduler<S, F> {
	timer: CountDownTimer,
	total_slots: usize,
	spawned_count: usize,
	halted: bool,
	strategy: S,
	factory: F,
}

impl<S: SpawnPointStrategy, F: EntityFactory> SpawnScheduler<S, F> {
	pub fn new(interval: f32, total_slots: usize, strategy: S, factory: F) -> Result<Self, ConfigError> {
		validate_duration("spawn interval", interval)?;
		Ok(Self {
			timer: CountDownTimer::new(interval)?,
			total_slots,
			spawned_count: 0,
			halted: false,
			strategy,
			factory,
		})
	}

	/// Begin (or resume) counting down to the next spawn. Does nothing once halted.
	pub fn start(&mut self) {
		if !self.halted && self.timer.start().is_some() {
			debug!("spawn timer started ({}s)", self.timer.initial());
		}
	}

	/// Advance the spawn timer. When the interval elapses this either spawns,
	/// returning the new entity (or why it couldn't be made), or halts if every
	/// slot has been filled.
	pub fn tick(&mut self, delta: f32) -> Option<Result<F::Entity, SpawnError>> {
		match self.timer.tick(delta)? {
			TimerEvent::Stopped => self.on_interval_elapsed(),
			TimerEvent::Started => None,
		}
	}

	fn on_interval_elapsed(&mut self) -> Option<Result<F::Entity, SpawnError>> {
		if self.spawned_count >= self.total_slots {
			info!("spawned all {} entities, halting", self.total_slots);
			self.halted = true;
			return None;
		}
		match self.spawn() {
			Ok(entity) => {
				self.spawned_count += 1;
				self.start();
				Some(Ok(entity))
			}
			Err(err) => {
				warn!("spawn failed, scheduler idle until restarted: {err}");
				Some(Err(err))
			}
		}
	}

	/// Create one entity right now, skipping the timer.
	/// This doesn't count toward `total_slots` and works even after halting.
	/// A factory that isn't [ready](EntityFactory::ready) fails without using up a spawn point.
	pub fn spawn(&mut self) -> Result<F::Entity, SpawnError> {
		self.factory.ready()?;
		let point = self.strategy.next_spawn_point().ok_or(SpawnError::NoSpawnPoint)?;
		self.factory.create(point)
	}

	pub fn spawned_count(&self) -> usize {
		self.spawned_count
	}

	pub fn total_slots(&self) -> usize {
		self.total_slots
	}

	pub fn remaining_spawns(&self) -> usize {
		self.total_slots.saturating_sub(self.spawned_count)
	}

	pub fn is_halted(&self) -> bool {
		self.halted
	}

	/// Whether the scheduler is currently counting down to a spawn
	pub fn is_running(&self) -> bool {
		self.timer.is_running()
	}

	pub fn interval(&self) -> f32 {
		self.timer.initial()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::spawn::{Collectible, CollectibleData, DescriptorFactory, LinearSpawnPointStrategy};
	use bevy::math::Vec2;

	type TestScheduler = SpawnScheduler<LinearSpawnPointStrategy, DescriptorFactory<Collectible>>;

	fn points(n: usize) -> Vec<Vec2> {
		(0..n).map(|i| Vec2::new(i as f32, 0.0)).collect()
	}

	fn coins() -> Vec<CollectibleData> {
		vec![CollectibleData {
			name: "coin".into(),
			score: 1,
		}]
	}

	fn scheduler(interval: f32, slots: usize) -> TestScheduler {
		SpawnScheduler::new(
			interval,
			slots,
			LinearSpawnPointStrategy::new(points(slots)),
			DescriptorFactory::seeded(coins(), 0),
		)
		.unwrap()
	}

	/// Ticks the scheduler, returning the step numbers (1-based) that produced an entity
	fn spawn_steps(scheduler: &mut TestScheduler, delta: f32, steps: usize) -> Vec<usize> {
		(1..=steps)
			.filter(|_| matches!(scheduler.tick(delta), Some(Ok(_))))
			.collect()
	}

	#[test]
	fn rejects_non_positive_interval() {
		let result = SpawnScheduler::new(
			0.0,
			3,
			LinearSpawnPointStrategy::new(points(3)),
			DescriptorFactory::<Collectible>::seeded(coins(), 0),
		);
		assert!(matches!(
			result,
			Err(ConfigError::InvalidDuration { timer: "spawn interval", .. })
		));
	}

	#[test]
	fn does_nothing_until_started() {
		let mut scheduler = scheduler(1.0, 3);
		assert!(spawn_steps(&mut scheduler, 1.0, 5).is_empty());
		assert_eq!(scheduler.spawned_count(), 0);
		assert!(!scheduler.is_halted());
	}

	#[test]
	fn spawns_once_per_interval_then_halts() {
		let mut scheduler = scheduler(1.0, 3);
		scheduler.start();
		assert_eq!(spawn_steps(&mut scheduler, 1.0, 3), vec![1, 2, 3]);
		assert_eq!(scheduler.spawned_count(), 3);
		assert!(!scheduler.is_halted());

		// t = 4: the interval elapses with every slot filled
		assert!(scheduler.tick(1.0).is_none());
		assert!(scheduler.is_halted());
		assert!(!scheduler.is_running());
		assert_eq!(scheduler.remaining_spawns(), 0);

		assert!(spawn_steps(&mut scheduler, 1.0, 10).is_empty());
		assert_eq!(scheduler.spawned_count(), 3);

		scheduler.start();
		assert!(!scheduler.is_running());
	}

	#[test]
	fn spawns_exactly_total_slots_with_small_steps() {
		let mut scheduler = scheduler(0.5, 4);
		scheduler.start();
		let steps = spawn_steps(&mut scheduler, 0.0625, 200);
		assert_eq!(steps, vec![8, 16, 24, 32]);
		assert!(scheduler.is_halted());
	}

	#[test]
	fn spawned_entities_follow_the_strategy() {
		let mut scheduler = scheduler(1.0, 3);
		scheduler.start();
		let positions: Vec<f32> = (0..3)
			.filter_map(|_| scheduler.tick(1.0))
			.map(|result| result.unwrap().position.x)
			.collect();
		assert_eq!(positions, vec![0.0, 1.0, 2.0]);
	}

	#[test]
	fn zero_slots_halts_on_first_interval() {
		let mut scheduler = scheduler(1.0, 0);
		scheduler.start();
		assert!(scheduler.tick(1.0).is_none());
		assert!(scheduler.is_halted());
	}

	#[test]
	fn manual_spawn_does_not_count() {
		let mut scheduler = scheduler(1.0, 2);
		let collectible = scheduler.spawn().unwrap();
		assert_eq!(collectible.name, "coin");
		assert_eq!(scheduler.spawned_count(), 0);
		assert_eq!(scheduler.remaining_spawns(), 2);
	}

	#[test]
	fn failed_spawn_leaves_scheduler_idle_but_tickable() {
		let mut scheduler: TestScheduler = SpawnScheduler::new(
			1.0,
			3,
			LinearSpawnPointStrategy::new(points(3)),
			DescriptorFactory::seeded(Vec::new(), 0),
		)
		.unwrap();
		scheduler.start();

		assert_eq!(scheduler.tick(1.0), Some(Err(SpawnError::NoDescriptor)));
		assert!(!scheduler.is_running());
		assert!(!scheduler.is_halted());
		assert_eq!(scheduler.spawned_count(), 0);

		// idle: further ticks do nothing
		assert_eq!(scheduler.tick(1.0), None);

		// restarting tries again
		scheduler.start();
		assert_eq!(scheduler.tick(1.0), Some(Err(SpawnError::NoDescriptor)));
	}

	#[test]
	fn failed_spawn_keeps_its_spawn_point() {
		let mut scheduler: TestScheduler = SpawnScheduler::new(
			1.0,
			3,
			LinearSpawnPointStrategy::new(points(3)),
			DescriptorFactory::seeded(Vec::new(), 0),
		)
		.unwrap();
		scheduler.start();
		assert_eq!(scheduler.tick(1.0), Some(Err(SpawnError::NoDescriptor)));
		assert_eq!(scheduler.spawn(), Err(SpawnError::NoDescriptor));

		assert_eq!(scheduler.strategy.next_spawn_point(), Some(Vec2::new(0.0, 0.0)));
	}

	#[test]
	fn missing_spawn_point_is_reported() {
		let mut scheduler: TestScheduler = SpawnScheduler::new(
			1.0,
			1,
			LinearSpawnPointStrategy::new(Vec::new()),
			DescriptorFactory::seeded(coins(), 0),
		)
		.unwrap();
		assert_eq!(scheduler.spawn(), Err(SpawnError::NoSpawnPoint));
	}
}
