//! Graviton - a first-person gravity gun sandbox
//!
//! Runs a headless demo: builds a small arena, spawns the player and drives it
//! with a scripted input timeline through the fixed-timestep loop.

mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::Vec3;
use graviton_core::GameTime;
use graviton_game::{
    FireOutcome, FirstPersonCharacter, InputAction, InputAxis, InputState, LogFeedback,
    WeaponActions,
};
use graviton_physics::{PhysicsWorld, ProjectilePool};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::GameSettings;

/// Length of the demo in seconds
const DEMO_LENGTH: f32 = 6.0;
/// Simulated render frame time
const FRAME_TIME: f32 = 1.0 / 30.0;

/// One scripted input change
#[derive(Debug, Clone, Copy)]
enum ScriptEvent {
    Press(InputAction),
    Release(InputAction),
    Axis(InputAxis, f32),
}

/// Demo input timeline, sorted by time
fn demo_script() -> Vec<(f32, ScriptEvent)> {
    use InputAction::*;
    use ScriptEvent::*;

    vec![
        // Shoot the crate ahead with the launcher
        (0.2, Press(Fire)),
        (0.3, Release(Fire)),
        // Switch to the gravity gun and look down at the crate
        (0.5, Press(SelectGravityMode)),
        (0.55, Release(SelectGravityMode)),
        (0.6, Axis(InputAxis::LookUpRate, -1.0)),
        (0.9, Axis(InputAxis::LookUpRate, 0.0)),
        // Grab, carry it around and throw it
        (1.0, Press(Fire)),
        (1.2, Axis(InputAxis::TurnRate, 1.0)),
        (1.5, Axis(InputAxis::TurnRate, 0.0)),
        (1.8, Press(Launch)),
        (1.9, Release(Launch)),
        (2.0, Release(Fire)),
        // Level the view and try to grab the pillar
        (2.5, Axis(InputAxis::LookUpRate, 1.0)),
        (2.8, Axis(InputAxis::LookUpRate, 0.0)),
        (3.0, Press(Fire)),
        (3.1, Release(Fire)),
        // Back to the launcher, walk and jump
        (3.5, Press(SelectProjectileMode)),
        (3.55, Release(SelectProjectileMode)),
        (3.6, Press(Fire)),
        (3.7, Release(Fire)),
        (4.0, Axis(InputAxis::MoveForward, 1.0)),
        (4.5, Axis(InputAxis::MoveForward, 0.0)),
        (4.6, Press(Jump)),
        (4.7, Release(Jump)),
    ]
}

/// Counts of what happened during the demo
#[derive(Debug, Default)]
struct DemoStats {
    projectiles_fired: u32,
    projectiles_blocked: u32,
    projectile_hits: u32,
    grabs: u32,
    failed_grabs: u32,
    releases: u32,
    launches: u32,
}

impl DemoStats {
    fn record(&mut self, actions: &WeaponActions) {
        match actions.fired {
            Some(FireOutcome::ProjectileSpawned(body)) => {
                self.projectiles_fired += 1;
                info!(?body, "Fired projectile");
            }
            Some(FireOutcome::ProjectileBlocked) => {
                self.projectiles_blocked += 1;
                warn!("Projectile blocked at the muzzle");
            }
            Some(FireOutcome::NoLauncher) => warn!("No launcher equipped"),
            Some(FireOutcome::Grabbed(body)) => {
                self.grabs += 1;
                info!(?body, "Gravity gun holding object");
            }
            Some(FireOutcome::GrabFailed(err)) => {
                self.failed_grabs += 1;
                info!("Gravity gun found nothing: {}", err);
            }
            None => {}
        }
        if actions.released {
            self.releases += 1;
        }
        if actions.launched {
            self.launches += 1;
        }
    }
}

/// Ground, a few crates and a pillar
fn build_arena(physics: &mut PhysicsWorld) {
    physics.create_ground(0.0);
    for position in [
        Vec3::new(0.0, 0.5, -5.0),
        Vec3::new(-2.0, 0.5, -7.0),
        Vec3::new(3.0, 0.5, -12.0),
    ] {
        physics.spawn_dynamic_box(Vec3::splat(0.5), position);
    }
    physics.create_static_box(Vec3::new(0.5, 1.5, 0.5), Vec3::new(2.4, 1.5, -10.0));
    physics.refresh_queries();
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Graviton...");

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let mut settings = GameSettings::load_from(settings_path.as_deref());
    // Physics and the fixed-step accumulator must agree on the step length
    settings.time.fixed_timestep = settings.physics.timestep;

    let mut physics = PhysicsWorld::with_config(settings.physics.clone());
    build_arena(&mut physics);

    let mut player = FirstPersonCharacter::spawn(&mut physics, Vec3::ZERO, settings.player.clone());
    let mut projectiles = ProjectilePool::new(settings.projectile.clone());
    let mut feedback = LogFeedback::default();
    let mut input = InputState::new();
    let mut time = GameTime::new(settings.time.clone());
    let fixed_dt = settings.time.fixed_timestep;

    let script = demo_script();
    let mut next_event = 0;
    let mut stats = DemoStats::default();

    while time.total_time < f64::from(DEMO_LENGTH) {
        time.update(FRAME_TIME);

        while let Some(&(at, event)) = script.get(next_event) {
            if f64::from(at) > time.total_time {
                break;
            }
            debug!(at, ?event, "Script event");
            match event {
                ScriptEvent::Press(action) => input.press(action),
                ScriptEvent::Release(action) => input.release(action),
                ScriptEvent::Axis(axis, value) => input.set_axis(axis, value),
            }
            next_event += 1;
        }

        for _ in 0..time.fixed_steps() {
            let actions = player.fixed_update(
                &mut physics,
                Some(&mut projectiles),
                &input,
                Some(&mut feedback),
                fixed_dt,
            );
            stats.record(&actions);

            // Edges are consumed by the first step of the frame
            input.clear_frame();

            physics.step();
            for hit in projectiles.update(&mut physics, fixed_dt) {
                stats.projectile_hits += 1;
                info!(body = ?hit.body, impulse = ?hit.impulse, "Projectile hit");
            }
        }
    }

    info!(
        position = ?player.position(),
        mode = ?player.weapon_mode(),
        holding = player.grabbed().is_some(),
        "Demo finished"
    );
    info!(
        fired = stats.projectiles_fired,
        blocked = stats.projectiles_blocked,
        hits = stats.projectile_hits,
        grabs = stats.grabs,
        failed_grabs = stats.failed_grabs,
        releases = stats.releases,
        launches = stats.launches,
        sounds = feedback.sounds_played,
        "Summary"
    );

    Ok(())
}
