//! Headless festival tour
//!
//! Visits each configured festival on a headless surface, triggers a few of
//! its interactions and logs what the scene manager does.
//!
//! Usage: `festivals [config.toml|config.ron]`

use std::rc::Rc;

use festival_engine::config::Config;
use festival_engine::foundation::logging;
use festival_engine::prelude::*;
use festival_engine::scene::{CulturalInfo, InteractionTelemetry, ProgressRecorder, ProgressValue};
use festivals::config::DemoConfig;
use festivals::scenes::{
    DiwaliScene, DussehraScene, GaneshScene, GulalColor, HoliScene, KumbhScene, NavratriScene,
};

/// Collaborator that writes every callback to the log
struct LogCollaborator;

impl InteractionTelemetry for LogCollaborator {
    fn notify_diya_lit(&self, count: usize) {
        log::info!("[telemetry] diyas lit: {}", count);
    }

    fn add_user_interaction(&self, description: &str) {
        log::info!("[telemetry] {}", description);
    }
}

impl CulturalInfo for LogCollaborator {
    fn show_cultural_info(&self, festival: FestivalId, topic: &str) {
        log::info!("[info] {} / {}", festival.display_name(), topic);
    }
}

impl ProgressRecorder for LogCollaborator {
    fn record_interaction(&self, festival: FestivalId, key: &str, value: ProgressValue) {
        log::info!("[progress] {}.{} = {:?}", festival, key, value);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => DemoConfig::load_from_file(&path)?,
        None => DemoConfig::default(),
    };
    logging::init_with_level(&config.log_level);
    config.validate()?;

    log::info!("Starting festival tour: {:?}", config.sequence);

    let collaborator = Rc::new(LogCollaborator);
    let collaborators = Collaborators::none()
        .with_telemetry(collaborator.clone())
        .with_cultural_info(collaborator.clone())
        .with_progress(collaborator);

    let mut manager = SceneManager::new(
        Box::new(HeadlessSurface::new(1280, 720)),
        festivals::registry(),
        config.manager.clone(),
    )
    .with_collaborators(collaborators);
    manager.initialize()?;

    let delta = config.frame_delta();
    let frames = config.frames_per_festival();
    for name in &config.sequence {
        // Let any running camera transition finish before switching.
        while manager.is_transitioning() {
            manager.frame(delta)?;
        }
        match manager.load_festival_scene(name) {
            Ok(TransitionOutcome::Started(festival)) => log::info!("Now showing {}", festival.display_name()),
            Ok(TransitionOutcome::Dropped) => log::warn!("Load of '{}' dropped", name),
            Err(error) => {
                log::error!("Could not show '{}': {}", name, error);
                continue;
            }
        }

        for frame in 0..frames {
            if frame == frames / 3 {
                interact(&mut manager);
            }
            manager.frame(delta)?;
        }

        log::info!(
            "{} frames rendered, {} scene resources live",
            manager.engine().map_or(0, |e| e.clock().frame_count()),
            manager.current_scene_resources()
        );
    }

    manager.dispose();
    log::info!("Festival tour finished");
    Ok(())
}

/// Trigger the signature interactions of whichever festival is live
fn interact(manager: &mut SceneManager) {
    let Some(festival) = manager.current_festival() else {
        return;
    };
    match festival {
        FestivalId::Diwali => {
            manager.with_current_scene::<DiwaliScene, _>(|scene, ctx| {
                scene.light_all_diyas();
                if let Err(error) = scene.launch_firework(ctx.world) {
                    log::warn!("Firework failed: {}", error);
                }
            });
        }
        FestivalId::Holi => {
            manager.with_current_scene::<HoliScene, _>(|scene, ctx| {
                scene.light_holika_bonfire(ctx.world);
                for (person, color) in GulalColor::ALL.iter().enumerate() {
                    if let Err(error) = scene.color_person(ctx.world, person, *color) {
                        log::warn!("Colouring failed: {}", error);
                    }
                }
            });
        }
        FestivalId::Navratri => {
            manager.with_current_scene::<NavratriScene, _>(|scene, ctx| {
                scene.start_garba();
                for day in 1..=9 {
                    scene.light_navratri_lamp(ctx.world, day);
                }
                scene.perform_aarti(ctx.world);
            });
        }
        FestivalId::Ganesh => {
            manager.with_current_scene::<GaneshScene, _>(|scene, ctx| {
                for plate in 0..scene.plates().len() {
                    scene.offer_modak(ctx.world, plate);
                }
                scene.offer_flowers(ctx.world);
                scene.start_procession();
            });
        }
        FestivalId::Dussehra => {
            manager.with_current_scene::<DussehraScene, _>(|scene, ctx| {
                scene.burn_ravana_effigy(ctx.world);
            });
        }
        FestivalId::Kumbh => {
            manager.with_current_scene::<KumbhScene, _>(|scene, ctx| {
                scene.greet_sadhu(0);
                scene.perform_holy_dip(ctx.world);
                if let Err(error) = scene.float_diya(ctx.world) {
                    log::warn!("Diya failed to float: {}", error);
                }
            });
        }
        FestivalId::Default => {}
    }
}
