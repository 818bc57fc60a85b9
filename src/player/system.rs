use crate::player::{JumpController, Player, PlayerControlParams, PlayerControlState};
use crate::PlayerStatusText;
use bevy::asset::{AssetEvent, Assets};
use bevy::input::ButtonInput;
use bevy::log::{error, info};
use bevy::math::Vec2;
use bevy::prelude::{EventReader, KeyCode, Query, Res, Text, Time, Transform, With};
use bevy_rapier2d::control::{KinematicCharacterController, KinematicCharacterControllerOutput};

/// Records jump button edges every frame, so the fixed-step [player_system] sees
/// each press and release exactly once even when it runs less often than `Update`.
pub fn player_input_system(
    kb: Res<ButtonInput<KeyCode>>,
    mut player_query: Query<&mut PlayerControlState, With<Player>>,
) {
    let pressed = kb.just_pressed(KeyCode::Space);
    let released = kb.just_released(KeyCode::Space);
    if !pressed && !released {
        return;
    }
    for mut player in &mut player_query {
        if pressed {
            player.jump_inputs.push(true);
        }
        if released {
            player.jump_inputs.push(false);
        }
    }
}

pub fn player_system(
    kb: Res<ButtonInput<KeyCode>>,
    mut player_query: Query<(
        &Player,
        &mut PlayerControlState,
        &mut KinematicCharacterController,
        &KinematicCharacterControllerOutput,
        &Transform,
    )>,
    control_params: Res<Assets<PlayerControlParams>>,
    mut status_text_query: Query<&mut Text, With<PlayerStatusText>>,
    time: Res<Time>,
) {
    for (player_component, mut player, mut controller, last_controller_out, player_transform) in &mut player_query {
        // edges are consumed every step, even ones that arrive while the player can't act on them
        let jump_inputs = std::mem::take(&mut player.jump_inputs);

        if let Some(player_params) = control_params.get(player_component.0.id()) {
            let player = &mut *player;

            if player.params_error.is_some() {
                continue;
            }
            if player.jump.is_none() {
                match JumpController::new(&player_params.jump) {
                    Ok(jump) => {
                        info!("jump controller ready: {:?}", player_params.jump);
                        player.jump = Some(jump);
                    }
                    Err(err) => {
                        error!("player params rejected: {err}");
                        player.params_error = Some(err);
                        continue;
                    }
                }
            }
            let Some(jump) = player.jump.as_mut() else {
                continue;
            };

            // sample ground state once, from the controller's last resolved move
            let grounded = last_controller_out.grounded;
            let was_grounded = player.grounded;
            player.grounded = grounded;

            for pressed in jump_inputs {
                if jump.request_jump(pressed, grounded) && pressed {
                    player.y_when_jumped = Some(player_transform.translation.y);
                }
            }

            let vy = jump.step(grounded, player_params.gravity, time.delta_secs());

            if !grounded && vy <= 0.0 {
                if let Some(y_when_jumped) = player.y_when_jumped.take() {
                    let apex = player_transform.translation.y;
                    info!("Jumped apex {:?} to {:?} (distance: {:?})!", y_when_jumped, apex, apex - y_when_jumped);
                }
            }
            if grounded && !was_grounded {
                info!("landed at {:?}", player_transform.translation.truncate());
            }

            let horizontal_input = match (
                kb.pressed(KeyCode::KeyA) || kb.pressed(KeyCode::ArrowLeft),
                kb.pressed(KeyCode::KeyD) || kb.pressed(KeyCode::ArrowRight),
            ) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            };
            player.own_velocity = Vec2::new(horizontal_input * player_params.move_speed, vy);

            if let Ok(mut status_text) = status_text_query.get_single_mut() {
                status_text.0 = format!(
                    "vx: {}\nvy: {}\ngrounded: {}\nphase: {:?}\ncooldown: {}\nair time: {:.2}",
                    player.own_velocity.x,
                    player.own_velocity.y,
                    grounded,
                    jump.phase(grounded),
                    jump.is_cooling_down(),
                    jump.air_time(),
                );
            }

            // send computed translation to controller for resolution in the physics world
            controller.translation = Some(player.own_velocity * time.delta_secs());
        } else {
            info!("player params not loaded yet");
        }
    }
}

/// Throws away the jump controller of any player whose params asset changed on disk,
/// so [player_system] rebuilds it from the new values.
pub fn player_params_reload_system(
    mut asset_events: EventReader<AssetEvent<PlayerControlParams>>,
    mut player_query: Query<(&Player, &mut PlayerControlState)>,
) {
    for event in asset_events.read() {
        if let AssetEvent::Modified { id } = event {
            for (player_component, mut player) in &mut player_query {
                if player_component.0.id() == *id {
                    info!("player params changed, rebuilding jump controller");
                    player.jump = None;
                    player.params_error = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::JumpParams;
    use bevy::app::{App, Update};
    use bevy::asset::Handle;
    use bevy::prelude::IntoSystemConfigs;

    fn params(jump_duration: f32) -> PlayerControlParams {
        PlayerControlParams {
            move_speed: 40.0,
            gravity: -98.0,
            jump: JumpParams {
                force: 60.0,
                duration: jump_duration,
                cooldown: 0.1,
                max_height: 8.0,
                gravity_multiplier: 3.0,
            },
        }
    }

    fn player_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Assets<PlayerControlParams>>();
        app
    }

    fn spawn_player(app: &mut App, params: Handle<PlayerControlParams>) {
        app.world_mut().spawn((
            Player(params),
            KinematicCharacterController::default(),
            KinematicCharacterControllerOutput::default(),
            Transform::default(),
        ));
    }

    fn tap_jump(app: &mut App) {
        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        input.press(KeyCode::Space);
        input.release(KeyCode::Space);
    }

    fn queued_inputs(app: &mut App) -> Vec<bool> {
        let world = app.world_mut();
        world.query::<&PlayerControlState>().single(world).jump_inputs.clone()
    }

    #[test]
    fn input_system_queues_press_then_release() {
        let mut app = player_app();
        app.add_systems(Update, player_input_system);
        spawn_player(&mut app, Handle::default());

        app.update();
        assert!(queued_inputs(&mut app).is_empty());

        tap_jump(&mut app);
        app.update();
        assert_eq!(queued_inputs(&mut app), vec![true, false]);
    }

    #[test]
    fn inputs_are_dropped_while_params_are_loading() {
        let mut app = player_app();
        app.add_systems(Update, (player_input_system, player_system).chain());
        spawn_player(&mut app, Handle::default());

        tap_jump(&mut app);
        app.update();
        assert!(queued_inputs(&mut app).is_empty());
    }

    #[test]
    fn inputs_are_dropped_when_params_are_rejected() {
        let mut app = player_app();
        app.add_systems(Update, (player_input_system, player_system).chain());
        let handle = app.world_mut().resource_mut::<Assets<PlayerControlParams>>().add(params(0.0));
        spawn_player(&mut app, handle);

        tap_jump(&mut app);
        app.update();
        app.update();

        let world = app.world_mut();
        let state = world.query::<&PlayerControlState>().single(world);
        assert!(state.params_error.is_some());
        assert!(state.jump.is_none());
        assert!(state.jump_inputs.is_empty());
    }

    #[test]
    fn queued_press_starts_a_jump_once() {
        let mut app = player_app();
        app.add_systems(Update, (player_input_system, player_system).chain());
        let handle = app.world_mut().resource_mut::<Assets<PlayerControlParams>>().add(params(0.3));
        spawn_player(&mut app, handle);
        let world = app.world_mut();
        world
            .query::<&mut KinematicCharacterControllerOutput>()
            .single_mut(world)
            .grounded = true;

        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::Space);
        app.update();

        let world = app.world_mut();
        let state = world.query::<&PlayerControlState>().single(world);
        assert!(state.jump_inputs.is_empty());
        assert!(state.jump.as_ref().is_some_and(|jump| jump.is_jumping()));
    }
}
