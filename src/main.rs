// src/main.rs

use std::io::Write;

use runguard::{cli, logging, process_exit_code, run};
use tracing::error;

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("runguard error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;

    let Some(report) = run(args).await? else {
        return Ok(0);
    };

    std::io::stdout().write_all(report.result.stdout.as_bytes())?;
    std::io::stderr().write_all(report.result.stderr.as_bytes())?;

    if let Some(err) = &report.audit_error {
        error!(error = %err, "command ran but its execution log entry was not written");
    }

    Ok(process_exit_code(&report.result))
}
