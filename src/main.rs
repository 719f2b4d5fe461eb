use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre;
use pipod::{AppConfig, start};

/// iPod-style music player for the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Media server URL, e.g. http://localhost:8096
    #[arg(short, long)]
    server: Option<String>,

    /// Media server user ID
    #[arg(short, long)]
    user_id: Option<String>,

    /// Media server API key
    #[arg(short, long)]
    api_key: Option<String>,

    /// Only list items below this library
    #[arg(long)]
    library_id: Option<String>,

    /// Directory with local music files
    #[arg(short, long)]
    music_dir: Option<PathBuf>,

    /// Do not verify the server's TLS certificate (self-signed servers only)
    #[arg(long)]
    insecure: bool,

    /// Load the library from the media server on startup
    #[arg(long)]
    remote: bool,

    /// Provide custom config path
    #[arg(short, long)]
    config: Option<String>,

    /// Where to write the log
    #[arg(long, default_value = "pipod.log")]
    log_file: PathBuf,

    /// Log level
    #[arg(long, default_value_t = log::LevelFilter::Debug)]
    log_level: log::LevelFilter,
}

fn setup_logging(path: &Path, level: log::LevelFilter) -> eyre::Result<()> {
    let target = Box::new(std::fs::File::create(path)?);

    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(target))
        .filter(None, level)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    setup_logging(&args.log_file, args.log_level)?;

    let mut config = AppConfig::load(args.config)?;
    if let Some(server) = args.server {
        config.remote.url = server;
    }
    if let Some(user_id) = args.user_id {
        config.remote.user_id = user_id;
    }
    if let Some(api_key) = args.api_key {
        config.remote.api_key = api_key;
    }
    if let Some(library_id) = args.library_id {
        config.remote.library_id = library_id;
    }
    if let Some(music_dir) = args.music_dir {
        config.music_dir = music_dir;
    }
    if args.insecure {
        log::warn!("--insecure given, TLS certificates of the media server are not checked");
        config.remote.insecure = true;
    }

    start(config, args.remote).await
}
