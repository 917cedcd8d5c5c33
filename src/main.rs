use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::prelude::*;

#[derive(Debug, Parser)]
struct Args {
    /// Conversation to open on startup.
    #[arg(long)]
    open: Option<String>,
    /// Where to write the debug log. The terminal belongs to the UI.
    #[arg(long, default_value = "palaver.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let log_file = std::sync::Mutex::new(std::fs::File::create(&args.log_file)?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(log_file))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (tx, rx) = mpsc::unbounded_channel();
    let scheduler = palaver_autoreply::ReplyScheduler::new(tx);
    palaver_tui::run(scheduler, rx, args.open).await?;
    Ok(())
}
