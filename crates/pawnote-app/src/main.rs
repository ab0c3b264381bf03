//! Paw Note command-line entry point.

use std::process::ExitCode;

#[cfg(feature = "native")]
fn main() -> ExitCode {
    use clap::Parser;

    env_logger::init();
    let cli = pawnote_app::cli::Cli::parse();
    log::debug!("Starting Paw Note");

    match pollster::block_on(pawnote_app::cli::run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.notice() {
                Some(notice) => eprintln!("{notice}"),
                None => {
                    log::error!("{e}");
                    eprintln!("error: {e}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() -> ExitCode {
    eprintln!("Native feature not enabled. Build with `--features native`");
    ExitCode::FAILURE
}
