//! `bpred-server` entry point.

use bpred_server::args::{Invocation, CONFIG_ENV, USAGE};
use bpred_server::{start_server, ServerError};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let env_config = std::env::var(CONFIG_ENV).ok();
    match Invocation::from_args(std::env::args().skip(1), env_config)? {
        Invocation::Help => {
            print!("{USAGE}");
            Ok(())
        }
        Invocation::Serve(config) => start_server(config).await,
    }
}
