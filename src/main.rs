mod player;
mod spawn;
mod util;

use crate::player::*;
use crate::spawn::*;
use crate::util::RonAssetLoader;
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy_rapier2d::prelude::*;

fn main() {
	App::new()
		// baseline bevy stuff
		.add_plugins(DefaultPlugins)
		.insert_resource(Time::<Fixed>::from_hz(60.))
		//
		// configuration assets
		.init_asset::<PlayerControlParams>()
		.init_asset_loader::<RonAssetLoader<PlayerControlParams>>()
		.init_asset::<SpawnerParams>()
		.init_asset_loader::<RonAssetLoader<SpawnerParams>>()
		.add_event::<CollectibleSpawned>()
		//
		// level, player, and collectibles
		.add_systems(Startup, (setup_camera, setup_player, setup_platforms, setup_spawner))
		.add_systems(Update, (player_input_system, player_params_reload_system))
		.add_systems(
			Update,
			(
				spawner_params_reload_system,
				collectible_spawner_setup_system,
				collectible_spawn_system,
			)
				.chain(),
		)
		.add_systems(FixedUpdate, player_system)
		//
		// rapier physics
		//
		.insert_resource(TimestepMode::Fixed {
			dt: 1. / 60.,
			substeps: 1,
		})
		.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(10.0).in_fixed_schedule())
		.add_plugins(RapierDebugRenderPlugin::default())
		.run();
}

fn setup_camera(mut commands: Commands) {
	commands.spawn((
		Camera2d,
		Transform::from_xyz(50.0, 50.0, 1.0),
		OrthographicProjection {
			scaling_mode: ScalingMode::AutoMin {
				min_width: 100.,
				min_height: 100.,
			},
			..OrthographicProjection::default_2d()
		},
	));
}

/// Position and size of a solid, axis-aligned block of level geometry
struct PlatformArgs {
	color: Color,
	pos: Vec2,
	size: Vec2,
}

impl PlatformArgs {
	fn new(pos: Vec2, size: Vec2) -> Self {
		Self {
			color: Color::srgb(0.15, 0.8, 0.25),
			pos,
			size,
		}
	}

	fn spawn(self, commands: &mut Commands) {
		let PlatformArgs { color, pos, size } = self;
		commands.spawn((
			RigidBody::Fixed,
			Sprite::from_color(color, size),
			Collider::cuboid(size.x * 0.5, size.y * 0.5),
			Transform::from_xyz(pos.x, pos.y, 0.0),
		));
	}
}

fn setup_platforms(mut commands: Commands) {
	// background
	commands.spawn((
		Sprite::from_color(Color::srgba(0., 0.5, 0.75, 0.2), Vec2::new(100., 100.)),
		Transform::from_xyz(50., 50., 0.),
	));

	let walls = Color::srgb(0.15, 0.5, 0.15);
	let blocks = [
		// floor
		PlatformArgs::new(Vec2::new(50., 3.), Vec2::new(98.0, 4.0)),
		// ledges the collectibles appear above
		PlatformArgs::new(Vec2::new(25.0, 18.0), Vec2::new(20.0, 4.0)),
		PlatformArgs::new(Vec2::new(75.0, 18.0), Vec2::new(20.0, 4.0)),
		PlatformArgs::new(Vec2::new(50.0, 33.0), Vec2::new(20.0, 2.0)),
		// west and east walls, ceiling
		PlatformArgs { color: walls, ..PlatformArgs::new(Vec2::new(3., 50.), Vec2::new(4.0, 98.0)) },
		PlatformArgs { color: walls, ..PlatformArgs::new(Vec2::new(97., 50.), Vec2::new(4.0, 98.0)) },
		PlatformArgs { color: walls, ..PlatformArgs::new(Vec2::new(50., 97.), Vec2::new(98.0, 4.0)) },
	];
	for block in blocks {
		block.spawn(&mut commands);
	}
}

#[derive(Component)]
pub struct PlayerStatusText;

fn setup_player(mut commands: Commands, asset_server: Res<AssetServer>) {
	commands.spawn((
		Player(asset_server.load("hero.player.ron")),
		Friction {
			coefficient: 0.0,
			combine_rule: CoefficientCombineRule::Multiply,
		},
		Sprite::from_color(Color::srgb(1., 0.5, 0.), Vec2::new(3.0, 5.0)),
		Collider::cuboid(1.5, 2.5),
		Transform::from_xyz(50., 10., 0.),
		RigidBody::KinematicPositionBased,
		KinematicCharacterController {
			filter_flags: QueryFilterFlags::EXCLUDE_DYNAMIC | QueryFilterFlags::EXCLUDE_SENSORS,
			..default()
		},
		KinematicCharacterControllerOutput::default(),
	));

	// Debug text for player state
	commands.spawn((
		PlayerStatusText,
		Text::new("loading"),
		TextLayout::new_with_justify(JustifyText::Right),
		Node {
			position_type: PositionType::Absolute,
			top: Val::Px(10.0),
			right: Val::Px(10.0),
			..default()
		},
	));
}

fn setup_spawner(mut commands: Commands, asset_server: Res<AssetServer>) {
	commands.spawn(CollectibleSpawner::new(asset_server.load("level.spawner.ron")));
}
