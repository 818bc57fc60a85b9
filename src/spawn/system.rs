use crate::spawn::{Collectible, CollectibleScheduler, SpawnerParams};
use bevy::asset::{AssetEvent, Assets, Handle};
use bevy::color::Color;
use bevy::log::{error, info};
use bevy::math::Vec2;
use bevy::prelude::{Commands, Component, Entity, Event, EventReader, EventWriter, Query, Res, Sprite, Time, Transform};
use bevy_rapier2d::geometry::{Collider, Sensor};

/// Sent after a collectible entity has been added to the world
#[derive(Event, Debug, Clone)]
pub struct CollectibleSpawned {
	pub entity: Entity,
	pub collectible: Collectible,
}

enum SpawnerState {
	/// waiting for params to load (or reload)
	Loading,
	Running(CollectibleScheduler),
	/// params were rejected; stays put until they change
	Misconfigured,
}

/// Drops collectibles into the level on a timer, as configured by a [SpawnerParams] asset.
#[derive(Component)]
pub struct CollectibleSpawner {
	pub params: Handle<SpawnerParams>,
	state: SpawnerState,
}

impl CollectibleSpawner {
	pub fn new(params: Handle<SpawnerParams>) -> Self {
		Self {
			params,
			state: SpawnerState::Loading,
		}
	}

	/// A spawner that skips loading and drives the given scheduler directly
	pub fn with_scheduler(params: Handle<SpawnerParams>, scheduler: CollectibleScheduler) -> Self {
		Self {
			params,
			state: SpawnerState::Running(scheduler),
		}
	}

	pub fn scheduler(&self) -> Option<&CollectibleScheduler> {
		match &self.state {
			SpawnerState::Running(scheduler) => Some(scheduler),
			_ => None,
		}
	}

	pub fn is_misconfigured(&self) -> bool {
		matches!(self.state, SpawnerState::Misconfigured)
	}
}

/// Builds and starts the scheduler of each spawner whose params have finished loading
pub fn collectible_spawner_setup_system(
	spawner_params: Res<Assets<SpawnerParams>>,
	mut spawner_query: Query<&mut CollectibleSpawner>,
) {
	for mut spawner in &mut spawner_query {
		if !matches!(spawner.state, SpawnerState::Loading) {
			continue;
		}
		if let Some(params) = spawner_params.get(spawner.params.id()) {
			spawner.state = match params.build_scheduler() {
				Ok(mut scheduler) => {
					info!(
						"collectible spawner ready: {} slots every {}s ({:?})",
						scheduler.total_slots(),
						scheduler.interval(),
						params.strategy
					);
					scheduler.start();
					SpawnerState::Running(scheduler)
				}
				Err(err) => {
					error!("spawner params rejected: {err}");
					SpawnerState::Misconfigured
				}
			};
		}
	}
}

pub fn collectible_spawn_system(
	mut commands: Commands,
	mut spawner_query: Query<&mut CollectibleSpawner>,
	mut spawned_events: EventWriter<CollectibleSpawned>,
	time: Res<Time>,
) {
	for mut spawner in &mut spawner_query {
		let SpawnerState::Running(scheduler) = &mut spawner.state else {
			continue;
		};
		// failures are logged by the scheduler, which then sits idle
		if let Some(Ok(collectible)) = scheduler.tick(time.delta_secs()) {
			info!(
				"spawned {} (score {}) at {:?}, {} left",
				collectible.name,
				collectible.score,
				collectible.position,
				scheduler.remaining_spawns()
			);
			let entity = commands
				.spawn((
					Sprite::from_color(Color::srgb(1.0, 0.85, 0.1), Vec2::splat(2.0)),
					Transform::from_translation(collectible.position.extend(0.5)),
					Collider::ball(1.0),
					Sensor,
					collectible.clone(),
				))
				.id();
			spawned_events.send(CollectibleSpawned { entity, collectible });
		}
	}
}

/// Sends spawners back to loading when their params asset changes on disk
pub fn spawner_params_reload_system(
	mut asset_events: EventReader<AssetEvent<SpawnerParams>>,
	mut spawner_query: Query<&mut CollectibleSpawner>,
) {
	for event in asset_events.read() {
		if let AssetEvent::Modified { id } = event {
			for mut spawner in &mut spawner_query {
				if spawner.params.id() == *id {
					info!("spawner params changed, rebuilding scheduler");
					spawner.state = SpawnerState::Loading;
				}
			}
		}
	}
}
