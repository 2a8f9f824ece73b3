use env_logger::{Builder, Env, Target};
use log::error;
use mangapanda_dl::cli::Cli;
use mangapanda_dl::run::run;
use std::process;

#[tokio::main]
async fn main() {
    // Init logging
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.target(Target::Stdout);
    builder.init();

    // Parse Args
    let cli = Cli::new();

    // Run
    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        process::exit(1);
    }
}
