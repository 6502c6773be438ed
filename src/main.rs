use colored::*;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match zendev::cli::run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
