use crate::spawn::{
	Collectible, CollectibleData, DescriptorFactory, LinearSpawnPointStrategy, RandomSpawnPointStrategy,
	SpawnPointStrategy, SpawnScheduler,
};
use crate::util::{ConfigError, RonAsset};
use bevy::math::Vec2;
use bevy::prelude::{Asset, TypePath};
use serde::Deserialize;

pub type BoxedStrategy = Box<dyn SpawnPointStrategy + Send + Sync>;

pub type CollectibleScheduler = SpawnScheduler<BoxedStrategy, DescriptorFactory<Collectible>>;

/// Which [SpawnPointStrategy] the spawner uses
#[derive(Copy, Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub enum StrategyKind {
	#[default]
	Linear,
	Random,
}

#[derive(Asset, Clone, Debug, Deserialize, TypePath)]
pub struct SpawnerParams {
	/// seconds between spawns
	pub interval: f32,

	#[serde(default)]
	pub strategy: StrategyKind,

	/// fixes the random choices made by the spawner, for reproducible runs
	#[serde(default)]
	pub seed: Option<u64>,

	/// candidate locations; one entity is spawned per point before the spawner halts
	pub spawn_points: Vec<Vec2>,

	pub collectibles: Vec<CollectibleData>,
}

impl RonAsset for SpawnerParams {
	const EXTENSIONS: &'static [&'static str] = &["spawner.ron"];
}

impl SpawnerParams {
	pub fn build_strategy(&self) -> BoxedStrategy {
		let points = self.spawn_points.clone();
		match (self.strategy, self.seed) {
			(StrategyKind::Linear, _) => Box::new(LinearSpawnPointStrategy::new(points)),
			(StrategyKind::Random, Some(seed)) => Box::new(RandomSpawnPointStrategy::seeded(points, seed)),
			(StrategyKind::Random, None) => Box::new(RandomSpawnPointStrategy::new(points)),
		}
	}

	pub fn build_factory(&self) -> DescriptorFactory<Collectible> {
		let descriptors = self.collectibles.clone();
		match self.seed {
			// offset so the factory doesn't mirror the strategy's choices
			Some(seed) => DescriptorFactory::seeded(descriptors, seed.wrapping_add(1)),
			None => DescriptorFactory::new(descriptors),
		}
	}

	/// Build a scheduler with one slot per spawn point
	pub fn build_scheduler(&self) -> Result<CollectibleScheduler, ConfigError> {
		SpawnScheduler::new(
			self.interval,
			self.spawn_points.len(),
			self.build_strategy(),
			self.build_factory(),
		)
	}
}
