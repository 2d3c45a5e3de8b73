use anyhow::Result;
use env_logger::Env;

use graphql_operations_validator::config::{Config, When};
use graphql_operations_validator::driver;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse configuration from command line and environment
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    match config.color {
        When::Always => colored::control::set_override(true),
        When::Never => colored::control::set_override(false),
        When::Auto => {}
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = driver::run(&config, &mut out).await?;

    log::debug!("{:?}", summary);

    Ok(())
}
