use loadramp_runtime::{cli, init_logging, RampRuntime};
use std::process::ExitCode;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if cli::wants_help(std::env::args_os().skip(1)) {
        eprintln!("{}", cli::USAGE);
        return ExitCode::FAILURE;
    }

    init_logging();

    match RampRuntime::new().with_env().run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Ramp failed: {err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
