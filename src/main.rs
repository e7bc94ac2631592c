// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, build a session and hand it to the
//   UI loop.
// - Returns `anyhow::Result` so configuration problems end the process with
//   a readable message.

use anyhow::Context;
use thunderdrive_cli::{ui::main_menu, DriveSession};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Host and paging cap come from `THUNDERDRIVE_*` variables, see
    // `DriveConfig::from_env`.
    let session = DriveSession::from_env().context("Failed to set up drive session")?;

    // Blocks until the user picks "Exit".
    main_menu(session)?;
    Ok(())
}
