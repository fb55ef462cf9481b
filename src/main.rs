use curtain::commands::Cli;
use curtain::libs::messages::macros::is_debug_mode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if is_debug_mode() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("curtain=debug"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
    }

    Cli::menu().await
}
