use bevy::asset::io::Reader;
use bevy::asset::{Asset, AssetLoader, LoadContext};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use thiserror::Error;

/// An asset type that is read from a RON file.
/// Each type claims its own compound extension (e.g. `player.ron`) so that
/// several RON loaders can be registered side by side.
pub trait RonAsset: Asset + DeserializeOwned {
	const EXTENSIONS: &'static [&'static str];
}

/// Loads any [RonAsset] by deserializing the whole file.
pub struct RonAssetLoader<A>(PhantomData<fn() -> A>);

impl<A> Default for RonAssetLoader<A> {
	fn default() -> Self {
		Self(PhantomData)
	}
}

#[derive(Debug, Error)]
pub enum RonLoaderError {
	#[error("Could not load asset: {0}")]
	Io(#[from] std::io::Error),

	#[error("Could not parse RON: {0}")]
	Ron(#[from] ron::de::SpannedError),
}

impl<A: RonAsset> AssetLoader for RonAssetLoader<A> {
	type Asset = A;
	type Settings = ();
	type Error = RonLoaderError;

	async fn load(
		&self,
		reader: &mut dyn Reader,
		_settings: &Self::Settings,
		_load_context: &mut LoadContext<'_>,
	) -> Result<Self::Asset, Self::Error> {
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes).await?;
		let asset = ron::de::from_bytes::<A>(&bytes)?;
		Ok(asset)
	}

	fn extensions(&self) -> &[&str] {
		A::EXTENSIONS
	}
}
