use std::time::Duration;

use clap::Parser;

use pulseboard::cli::Args;
use pulseboard::{render_page, stream_live, Dashboard, DatasetGenerator, LiveBoard, PulseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr so `--json` output stays machine-readable.
    let log_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = match &args.config {
        Some(path) => PulseConfig::load(path)?,
        None => PulseConfig::default(),
    };
    let config = args.apply_to(config);
    let seed = config.resolve_seed();

    let data = DatasetGenerator::new(seed)
        .days(config.dataset.days)
        .conversations(config.dataset.conversations)
        .generate()
        .shared();

    let mut board = LiveBoard::new(&config.live, seed);
    let mut dashboard = Dashboard::new(data, config);
    dashboard.search = args.search.clone();
    dashboard.selected = args.id.clone();

    println!("{}", render_page(&dashboard, args.page, &board, args.json)?);

    if let Some(secs) = args.live {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        stream_live(&mut board, Duration::from_secs(secs), args.json, &mut out).await?;
    }

    Ok(())
}
