mod commands;
mod defines;
mod errors;
mod gateway;
mod impls;
mod order;
mod transport;
mod types;
mod util;

use clap::Parser;
use commands::*;
use gateway::TradingGateway;
use std::process::ExitCode;
use transport::HttpTransport;
use types::*;
use util::*;

fn main() -> ExitCode {
    // parse arguments via clap
    let cmd_args = CommandlineArgs::parse();

    // .env is optional, real environment variables take precedence
    dotenvy::dotenv().ok();

    let _log_guard = match init_logging(&cmd_args.log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let trading_context = match TradingContext::from_env(&cmd_args) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration. API keys belong in the environment or a .env file.");
            return ExitCode::from(2);
        }
    };
    tracing::info!(
        base_url = %trading_context.base_url,
        testnet = trading_context.use_testnet,
        "using exchange endpoint"
    );

    let gateway = match HttpTransport::new(&trading_context).and_then(TradingGateway::connect) {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize. Exiting.");
            return ExitCode::from(2);
        }
    };

    let mut start = std::time::Instant::now();
    measure_start(&mut start);

    let outcome = run_command(&gateway, &cmd_args.command);
    measure_end(&start);

    if let Err(e) = &outcome {
        tracing::debug!(error = ?e, "command failed");
    }
    let (text, succeeded) = render_result(&outcome, &cmd_args.log_file);
    println!("{}", text);
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
