//! quickgist: native-messaging host and command-line client.
//!
//! With no subcommand it speaks the native-messaging protocol on
//! stdin/stdout. That is how browsers launch a native host: Chrome passes
//! the caller's origin (plus `--parent-window` on Windows), Firefox passes
//! the manifest path and the extension id. Logs always go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use quickgist::server::{Config, Secrets};
use quickgist::{CacheStore, Namespace, QuickGistError, SummaryMode, SystemClock};

/// QuickGist transcript and summary host
#[derive(Parser)]
#[command(name = "quickgist")]
#[command(version)]
#[command(about = "Cached YouTube transcripts and summaries")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Arguments passed by the browser when launching a native host.
    #[arg(hide = true)]
    launch_args: Vec<String>,

    /// Parent window handle passed by the browser on Windows.
    #[arg(long = "parent-window", hide = true)]
    parent_window: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the native-messaging host on stdin/stdout
    Host,

    /// Print the transcript of a video
    Transcript {
        /// Video id or watch URL
        video: String,
    },

    /// Print a summary of a video
    Summary {
        /// Video id or watch URL
        video: String,
        /// Summary mode: brief, detailed or actionable
        #[arg(short, long, default_value = "brief")]
        mode: SummaryMode,
    },

    /// Inspect or clear the cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show entry counts per cache
    Info,
    /// Remove all cached transcripts and summaries
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing on stderr (default: warn; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command.unwrap_or(Command::Host) {
        Command::Host => {
            let secrets = Secrets::load()?;
            let router = Arc::new(config.builder(&secrets).build()?);
            info!(
                launch_args = ?args.launch_args,
                parent_window = args.parent_window.as_deref(),
                "serving native messaging"
            );
            quickgist::server::serve(router, tokio::io::stdin(), tokio::io::stdout()).await?;
        }

        Command::Transcript { video } => {
            let secrets = Secrets::load()?;
            let router = config.builder(&secrets).build()?;
            let video_id = parse_video(&video)?;
            let reply = router.get_transcript(video_id).await?;
            println!("{}", reply.transcript);
        }

        Command::Summary { video, mode } => {
            let secrets = Secrets::load()?;
            let router = config.builder(&secrets).build()?;
            let video_id = parse_video(&video)?;
            let reply = router.get_summary(video_id, Some(mode)).await?;
            eprintln!(
                "source: {}{}",
                reply.source,
                if reply.cached { " (cached)" } else { "" }
            );
            println!("{}", reply.summary);
        }

        Command::Cache { action } => {
            let cache = CacheStore::new(config.store(), Arc::new(SystemClock));
            match action {
                CacheAction::Info => {
                    let info = cache.info().await;
                    println!("transcripts: {}", info.transcripts);
                    println!("summaries:   {}", info.summaries);
                }
                CacheAction::Clear => {
                    cache.clear(&Namespace::ALL).await;
                    println!("cache cleared");
                }
            }
        }
    }

    Ok(())
}

fn parse_video(input: &str) -> Result<&str, QuickGistError> {
    quickgist::normalize_video_id(input).ok_or_else(|| {
        QuickGistError::InvalidInput(format!("not a video id or watch URL: {input}"))
    })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn chrome_launch_runs_host() {
        let args = Args::try_parse_from(["quickgist", "chrome-extension://abcdef/"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.launch_args, ["chrome-extension://abcdef/"]);

        let args = Args::try_parse_from([
            "quickgist",
            "chrome-extension://abcdef/",
            "--parent-window=0",
        ])
        .unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.parent_window.as_deref(), Some("0"));
    }

    #[test]
    fn firefox_launch_runs_host() {
        let args = Args::try_parse_from([
            "quickgist",
            "/home/u/.mozilla/native-messaging-hosts/quickgist.json",
            "quickgist@example.org",
        ])
        .unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.launch_args.len(), 2);
        assert_eq!(args.launch_args[1], "quickgist@example.org");
    }

    #[test]
    fn subcommands_still_parse() {
        let args = Args::try_parse_from(["quickgist", "cache", "info"]).unwrap();
        assert!(args.launch_args.is_empty());
        assert!(matches!(
            args.command,
            Some(Command::Cache {
                action: CacheAction::Info
            })
        ));

        let args = Args::try_parse_from(["quickgist", "summary", "v1", "--mode", "detailed"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Command::Summary {
                mode: SummaryMode::Detailed,
                ..
            })
        ));
    }
}
