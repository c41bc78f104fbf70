//! # Jobline Main Entry Point

use anyhow::Result;
use jobline::cmd_args::CommandLineArgs;
use jobline::config::{self, NotionProfile};
use jobline::{demo, AppController, NotionClient};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

const LOG_LEVEL_ENV_VAR: &str = "JOBLINE_LOG_LEVEL";

// Requests are awaited one after another; a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cmd_args = CommandLineArgs::parse();
    init_tracing_subscriber(&cmd_args)?;

    let profile_path = config::get_profile_path();
    let profile = NotionProfile::load(cmd_args.profile(), &profile_path)?;
    tracing::debug!(
        "Using profile '{}' against {}",
        profile.name,
        profile.api_url
    );
    let client = NotionClient::new(&profile.connection_settings())?;

    if !atty::is(atty::Stream::Stdout) || !atty::is(atty::Stream::Stdin) {
        tracing::info!("Not attached to a terminal, running the demo without the menu");
        let mut stdout = std::io::stdout().lock();
        demo::run_demo(&client, &profile.database_id, &profile.schema_path, &mut stdout).await?;
        return Ok(());
    }

    let mut app = AppController::new(profile, client);
    app.run().await
}

fn init_tracing_subscriber(cmd_args: &CommandLineArgs) -> Result<()> {
    let default_level = if cmd_args.verbose() { "debug" } else { "error" };
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level))
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("hyper_util=warn".parse()?)
        .add_directive("rustls=warn".parse()?)
        .add_directive("tokio=warn".parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339());

    match cmd_args.log_file() {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
