//! Headless authoring API server entrypoint.

use lessonpress_core::store::ArticleStore;
use lessonpress_core::DEFAULT_PORT;
use lessonpress_server::{config::env_flag_enabled, serve_router, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    check: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--check" => flags.check = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

/// Parse the configured source file once so misconfiguration shows up at
/// startup instead of on the first save.
fn check_source_file(config: &Config) -> anyhow::Result<usize> {
    let store = ArticleStore::new(&config.articles_path, config.id_range);
    let summaries = store.list()?;
    Ok(summaries.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lessonpress=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    if config.is_production() {
        tracing::warn!("APP_ENV is production; every article endpoint will answer 403");
    }

    match check_source_file(&config) {
        Ok(count) => tracing::info!(
            "Loaded {} article(s) from {}",
            count,
            config.articles_path.display()
        ),
        Err(err) if cli_flags.check => return Err(err),
        Err(err) => tracing::warn!(
            "Article source {} is not usable yet: {}",
            config.articles_path.display(),
            err
        ),
    }
    if cli_flags.check {
        return Ok(());
    }

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    let bind_addr = lessonpress_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let state = AppState::new(config);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("LessonPress running at http://{}", actual_addr);

    serve_router(listener, state, shutdown_signal()).await?;
    tracing::info!("LessonPress stopped");
    Ok(())
}

fn print_help() {
    println!("LessonPress authoring server\n");
    println!("Usage: lessonpress [OPTIONS]\n");
    println!("Options:");
    println!("  --check           Parse the article source file and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  CONTENT_ROOT      Directory for relative fileLocation values (default: ./src/data)");
    println!("  ARTICLES_FILE     Article source file (default: <CONTENT_ROOT>/newsData.js)");
    println!("  TOPICS_FILE       Topic sidecar file (default: <CONTENT_ROOT>/articleTopics.js)");
    println!(
        "  PORT              Server port (default: {})",
        DEFAULT_PORT
    );
    println!("  APP_ENV           'production' disables all article endpoints");
    println!("  DEV_ORIGIN        Only Origin allowed to call the API (default: http://localhost:3000)");
    println!("  CANONICAL_ID_MIN  Lowest id number used for allocation (default: 1)");
    println!("  CANONICAL_ID_MAX  Highest id number used for allocation (default: 100)");
    println!("  MAX_BODY_SIZE     Maximum request body in bytes (default: 5MB)");
    println!("  TOPIC_SYNC_ATTEMPTS  Attempts for each topic sidecar write (default: 3)");
    println!("  ALLOW_PUBLIC_ACCESS  Permit a non-loopback BIND address");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::{check_source_file, parse_cli_flags, CliFlags};
    use lessonpress_server::Config;

    #[test]
    fn parse_cli_flags_rejects_unknown_and_positional_arguments() {
        let cases = [
            (
                vec!["lessonpress".to_string(), "--chek".to_string()],
                "Unknown option",
            ),
            (
                vec!["lessonpress".to_string(), "serve".to_string()],
                "Unexpected positional argument",
            ),
        ];

        for (args, expected_fragment) in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains(expected_fragment));
        }
    }

    #[test]
    fn parse_cli_flags_accepts_supported_options() {
        let args = vec!["lessonpress".to_string(), "--check".to_string()];
        let flags = parse_cli_flags(&args).expect("known options should parse");
        assert_eq!(
            flags,
            CliFlags {
                help: false,
                check: true,
            }
        );
    }

    #[test]
    fn check_source_file_counts_records_and_reports_missing_file() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let config = Config::for_content_root(temp_dir.path());
        let err = check_source_file(&config).expect_err("missing source file");
        assert!(err.to_string().contains("not found"));

        std::fs::write(
            &config.articles_path,
            "export const newsData = [\n  { id: 'rec001', fields: { \"Headline\": \"A\", } },\n];\n",
        )
        .expect("write source");
        assert_eq!(check_source_file(&config).expect("check"), 1);
    }
}
