use bevy::math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses where the next entity appears.
///
/// Returning `None` means there is nowhere to spawn; the scheduler reports that
/// as [SpawnError::NoSpawnPoint](crate::spawn::SpawnError::NoSpawnPoint).
pub trait SpawnPointStrategy {
	fn next_spawn_point(&mut self) -> Option<Vec2>;
}

impl<S: SpawnPointStrategy + ?Sized> SpawnPointStrategy for Box<S> {
	fn next_spawn_point(&mut self) -> Option<Vec2> {
		(**self).next_spawn_point()
	}
}

/// Walks the spawn points in order, wrapping back to the first after the last.
#[derive(Debug, Clone)]
pub struct LinearSpawnPointStrategy {
	points: Vec<Vec2>,
	index: usize,
}

impl LinearSpawnPointStrategy {
	pub fn new(points: Vec<Vec2>) -> Self {
		Self { points, index: 0 }
	}
}

impl SpawnPointStrategy for LinearSpawnPointStrategy {
	fn next_spawn_point(&mut self) -> Option<Vec2> {
		if self.index >= self.points.len() {
			self.index = 0;
		}
		let point = self.points.get(self.index).copied()?;
		self.index += 1;
		Some(point)
	}
}

/// Picks spawn points at random without repeating one until every point has been used,
/// then starts over with the full set.
#[derive(Debug, Clone)]
pub struct RandomSpawnPointStrategy {
	points: Vec<Vec2>,
	unused: Vec<Vec2>,
	rng: StdRng,
}

impl RandomSpawnPointStrategy {
	pub fn new(points: Vec<Vec2>) -> Self {
		Self::with_rng(points, StdRng::from_entropy())
	}

	pub fn seeded(points: Vec<Vec2>, seed: u64) -> Self {
		Self::with_rng(points, StdRng::seed_from_u64(seed))
	}

	fn with_rng(points: Vec<Vec2>, rng: StdRng) -> Self {
		Self {
			unused: points.clone(),
			points,
			rng,
		}
	}
}

impl SpawnPointStrategy for RandomSpawnPointStrategy {
	fn next_spawn_point(&mut self) -> Option<Vec2> {
		if self.unused.is_empty() {
			self.unused.extend_from_slice(&self.points);
		}
		if self.unused.is_empty() {
			return None;
		}
		let index = self.rng.gen_range(0..self.unused.len());
		Some(self.unused.swap_remove(index))
	}
}
