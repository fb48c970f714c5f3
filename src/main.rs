mod args;
mod kiosk;

use clap::Parser;
use log::info;
use snafu::ErrorCompat;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    info!("args: {:?}", args);

    let res = kiosk::run_session(
        &args.script,
        args.variant.as_deref(),
        args.out.as_deref(),
        args.reference.as_deref(),
    );

    match res {
        Ok(outcome) => {
            for line in outcome.transcript.iter() {
                println!("{}", line);
            }
            info!(
                "Session ended on the {} screen with {} votes ({} reports, {} ignored actions)",
                outcome.screen,
                outcome.total,
                outcome.reports.len(),
                outcome.ignored
            );
        }
        Err(e) => {
            eprintln!("An error occured {}", e);
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            }
            std::process::exit(1);
        }
    }
}
