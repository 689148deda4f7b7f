use anyhow::{Context, Result};
use meal_planner::clipboard::{ClipboardSink, FileClipboard, StdoutClipboard};
use meal_planner::planner_config::PlannerConfig;
use meal_planner::session::PlannerSession;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting meal planner");

    let config = PlannerConfig::from_env()?;
    info!(source = %config.source, language = %config.language, "Configuration loaded");

    let clipboard: Box<dyn ClipboardSink> = match &config.clipboard_file {
        Some(path) => Box::new(FileClipboard::new(path)),
        None => Box::new(StdoutClipboard),
    };

    let mut session = PlannerSession::new(&config, clipboard)?;
    println!("{}", session.reload().await);
    println!("{}", session.help());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        if let Some(reply) = session.handle_line(&line).await {
            println!("{}", reply.text);
            if reply.quit {
                break;
            }
        }
    }

    info!("Meal planner stopped");
    Ok(())
}

/// Log to stderr so stdout stays reserved for the planner itself.
/// `RUST_LOG` selects the filter, `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
