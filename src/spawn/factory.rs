use crate::spawn::SpawnError;
use bevy::math::Vec2;
use bevy::prelude::Component;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// Builds the entity the scheduler hands to the world.
/// Placement and registration in the world are up to the caller.
pub trait EntityFactory {
	type Entity;

	/// Whether [EntityFactory::create] can succeed, checked before a spawn point is claimed
	fn ready(&self) -> Result<(), SpawnError> {
		Ok(())
	}

	fn create(&mut self, at: Vec2) -> Result<Self::Entity, SpawnError>;
}

/// An entity kind built from an immutable data template.
pub trait SpawnableEntity: Sized {
	type Descriptor;

	fn from_descriptor(descriptor: &Self::Descriptor, at: Vec2) -> Self;
}

/// [EntityFactory] that picks one of a fixed set of descriptors at random for each entity.
pub struct DescriptorFactory<E: SpawnableEntity> {
	descriptors: Vec<E::Descriptor>,
	rng: StdRng,
}

impl<E: SpawnableEntity> DescriptorFactory<E> {
	pub fn new(descriptors: Vec<E::Descriptor>) -> Self {
		Self {
			descriptors,
			rng: StdRng::from_entropy(),
		}
	}

	pub fn seeded(descriptors: Vec<E::Descriptor>, seed: u64) -> Self {
		Self {
			descriptors,
			rng: StdRng::seed_from_u64(seed),
		}
	}

	pub fn descriptors(&self) -> &[E::Descriptor] {
		&self.descriptors
	}
}

impl<E: SpawnableEntity> EntityFactory for DescriptorFactory<E> {
	type Entity = E;

	fn ready(&self) -> Result<(), SpawnError> {
		if self.descriptors.is_empty() {
			Err(SpawnError::NoDescriptor)
		} else {
			Ok(())
		}
	}

	fn create(&mut self, at: Vec2) -> Result<E, SpawnError> {
		self.ready()?;
		let index = self.rng.gen_range(0..self.descriptors.len());
		Ok(E::from_descriptor(&self.descriptors[index], at))
	}
}

/// Template for a collectible
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectibleData {
	pub name: String,
	pub score: u32,
}

/// Something the player can pick up for points
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Collectible {
	pub name: String,
	pub score: u32,
	pub position: Vec2,
}

impl SpawnableEntity for Collectible {
	type Descriptor = CollectibleData;

	fn from_descriptor(descriptor: &CollectibleData, at: Vec2) -> Self {
		Self {
			name: descriptor.name.clone(),
			score: descriptor.score,
			position: at,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn coin() -> CollectibleData {
		CollectibleData {
			name: "coin".into(),
			score: 1,
		}
	}

	fn gem() -> CollectibleData {
		CollectibleData {
			name: "gem".into(),
			score: 5,
		}
	}

	#[test]
	fn creates_collectible_at_point() {
		let mut factory = DescriptorFactory::<Collectible>::seeded(vec![coin()], 1);
		let collectible = factory.create(Vec2::new(4.0, 8.0)).unwrap();
		assert_eq!(
			collectible,
			Collectible {
				name: "coin".into(),
				score: 1,
				position: Vec2::new(4.0, 8.0),
			}
		);
	}

	#[test]
	fn picks_only_from_its_descriptors() {
		let mut factory = DescriptorFactory::<Collectible>::seeded(vec![coin(), gem()], 3);
		for _ in 0..20 {
			let collectible = factory.create(Vec2::ZERO).unwrap();
			assert!(matches!(collectible.score, 1 | 5));
		}
		assert_eq!(factory.descriptors().len(), 2);
	}

	#[test]
	fn no_descriptors_fails() {
		let mut factory = DescriptorFactory::<Collectible>::seeded(Vec::new(), 3);
		assert_eq!(factory.create(Vec2::ZERO), Err(SpawnError::NoDescriptor));
	}
}
