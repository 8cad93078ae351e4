use std::time::Duration;

use engine::{
    resolve_app_paths, CancelToken, InputAction, InputState, LoopConfig, NullRenderer,
    PersistenceError, SaveRepository, ScriptedInput, StartupError, TerrainError,
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::config::{load_items, load_settings, ConfigError};
use super::gameplay::GameplaySession;

pub(crate) const RUN_SECONDS_ENV_VAR: &str = "SIMCORE_RUN_SECONDS";
const DEFAULT_RUN_SECONDS: f64 = 2.0;
const DEMO_LEG_TICKS: usize = 45;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) cancel: CancelToken,
    pub(crate) session: GameplaySession,
    pub(crate) repository: SaveRepository,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Simcore Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "root_resolved");

    let settings = load_settings(&paths.settings_file())?;
    let items = load_items(&paths.items_file())?;

    let cancel = CancelToken::new();
    let mut session = GameplaySession::build(
        &settings,
        items,
        Box::new(ScriptedInput::new(demo_input_script())),
        Box::new(NullRenderer::new()),
        cancel.clone(),
    )?;

    let repository = SaveRepository::open(paths.save_file())?;
    match repository.load_latest()? {
        Some(snapshot) => {
            session.restore(&snapshot);
        }
        None => info!(path = %repository.path().display(), "no_save_found"),
    }

    let run_seconds = std::env::var(RUN_SECONDS_ENV_VAR).ok();
    let config = LoopConfig {
        run_for: Some(parse_run_duration(run_seconds.as_deref())),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        cancel,
        session,
        repository,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Unset means the default run length; unparsable or non-positive values fall back to it too.
fn parse_run_duration(raw: Option<&str>) -> Duration {
    let default = Duration::from_secs_f64(DEFAULT_RUN_SECONDS);
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds > 0.0 => Duration::from_secs_f64(seconds),
        _ => {
            warn!(
                var = RUN_SECONDS_ENV_VAR,
                value = raw,
                fallback_seconds = DEFAULT_RUN_SECONDS,
                "invalid_run_seconds"
            );
            default
        }
    }
}

/// Walks a loop around the spawn point, firing on the horizontal legs.
fn demo_input_script() -> Vec<InputState> {
    let legs = [
        (InputAction::MoveRight, true),
        (InputAction::MoveDown, false),
        (InputAction::MoveLeft, true),
        (InputAction::MoveUp, false),
    ];
    let mut script = Vec::with_capacity(legs.len() * DEMO_LEG_TICKS);
    for (direction, firing) in legs {
        let state = InputState::empty()
            .with_action_down(direction, true)
            .with_action_down(InputAction::Fire, firing);
        script.extend(std::iter::repeat(state).take(DEMO_LEG_TICKS));
    }
    script.push(InputState::empty());
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_duration_defaults_when_unset() {
        assert_eq!(parse_run_duration(None), Duration::from_secs(2));
    }

    #[test]
    fn run_duration_parses_fractional_seconds() {
        assert_eq!(
            parse_run_duration(Some(" 0.5 ")),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn invalid_run_duration_falls_back() {
        for raw in ["soon", "-1", "0", "NaN"] {
            assert_eq!(parse_run_duration(Some(raw)), Duration::from_secs(2));
        }
    }

    #[test]
    fn demo_script_ends_idle() {
        let script = demo_input_script();
        assert_eq!(script.len(), 4 * DEMO_LEG_TICKS + 1);
        assert!(script[0].is_down(InputAction::MoveRight));
        assert!(script[0].fire_pressed());
        assert!(!script[DEMO_LEG_TICKS].fire_pressed());
        assert_eq!(script.last(), Some(&InputState::empty()));
    }
}
