use std::process::ExitCode;

use engine::Scheduler;
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) const AUTOSAVE_NAME: &str = "autosave";

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        cancel,
        mut session,
        mut repository,
    } = app;

    let summary = {
        let mut scheduler = Scheduler::new(config);
        scheduler.add_system(Box::new(&mut session));
        scheduler.run(&cancel)
    };

    let player = session.player();
    info!(
        ticks = summary.ticks,
        exit_reason = ?summary.exit_reason,
        kills = session.total_kills(),
        enemies_left = session.enemies().len(),
        hp = player.health().current(),
        stamina = player.stamina().current(),
        x = player.position().x,
        y = player.position().y,
        play_time_seconds = session.play_time_seconds(),
        "session_finished"
    );

    match repository.save_snapshot(&session.snapshot_request(AUTOSAVE_NAME)) {
        Ok(save_id) => info!(save_id, path = %repository.path().display(), "autosave_written"),
        Err(err) => {
            error!(error = %err, "autosave_failed");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
