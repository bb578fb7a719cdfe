//! BizIntel - pipeline insights from monday.com boards
//!
//! The `bizintel` command reads a deals board and a work-orders board and
//! answers keyword questions about them.
//!
//! ## Commands
//!
//! - `auth`: Verify the API token
//! - `metrics`: Print the dashboard tiles (text or JSON)
//! - `ask`: Answer one question
//! - `chat`: Answer questions from stdin until EOF

mod terminal;

use anyhow::{Context, Result};
use bizintel_core::pipeline::{DEFAULT_DEALS_BOARD, DEFAULT_WORK_ORDERS_BOARD};
use bizintel_core::{
    BoardId, BoardIds, BoardSource, FileBoardSource, InsightPipeline, PipelineError,
    RefreshPolicy, SystemClock,
};
use bizintel_monday::{MondayClient, MondayConfig, DEFAULT_API_URL};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

use terminal::{tile_lines, TerminalPresenter};

#[derive(Parser)]
#[command(name = "bizintel")]
#[command(author = "BizIntel Maintainers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pipeline and forecast insights from monday.com boards", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Where boards come from.
#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// monday.com API token
    #[arg(long, env = "MONDAY_API_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// monday.com GraphQL endpoint
    #[arg(long, env = "MONDAY_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Deals board id
    #[arg(
        long,
        env = "BIZINTEL_DEALS_BOARD",
        default_value_t = DEFAULT_DEALS_BOARD,
        global = true
    )]
    deals_board: BoardId,

    /// Work-orders board id
    #[arg(
        long,
        env = "BIZINTEL_WORK_ORDERS_BOARD",
        default_value_t = DEFAULT_WORK_ORDERS_BOARD,
        global = true
    )]
    work_orders_board: BoardId,

    /// Read boards from `<dir>/<board_id>.json` instead of the API
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,
}

impl SourceArgs {
    fn boards(&self) -> BoardIds {
        BoardIds {
            deals: self.deals_board,
            work_orders: self.work_orders_board,
        }
    }

    fn build_source(&self) -> Result<Arc<dyn BoardSource>> {
        if let Some(dir) = &self.fixtures {
            info!(dir = %dir.display(), "reading boards from fixtures");
            return Ok(Arc::new(FileBoardSource::new(dir)));
        }

        let mut config = MondayConfig::from_env();
        config.api_url = self.api_url.clone();
        if let Some(token) = &self.token {
            config = config.with_token(token);
        }
        Ok(Arc::new(MondayClient::new(config)?))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the API token against the board source
    Auth,

    /// Print total pipeline, weighted forecast and work-order count
    Metrics {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Answer a single question
    Ask {
        /// Free-text question, e.g. "pipeline and forecast"
        question: String,
    },

    /// Interactive session reading one question per line
    Chat {
        /// Re-fetch both boards before every answer
        #[arg(long)]
        recompute: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    bizintel_core::init_tracing(cli.json, level);

    let source = cli
        .source
        .build_source()
        .context("Failed to set up board source")?;
    let pipeline =
        InsightPipeline::new(source.clone(), Arc::new(SystemClock), cli.source.boards());
    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::Auth => cmd_auth(source.as_ref(), &mut stdout).await,
        Commands::Metrics { format } => cmd_metrics(&pipeline, format, &mut stdout).await,
        Commands::Ask { question } => cmd_ask(&pipeline, &question, &mut stdout).await,
        Commands::Chat { recompute } => cmd_chat(&pipeline, recompute).await,
    }
}

async fn cmd_auth(source: &dyn BoardSource, out: &mut impl Write) -> Result<()> {
    source
        .authenticate()
        .await
        .map_err(PipelineError::Authentication)?;
    writeln!(out, "Authenticated.")?;
    Ok(())
}

async fn cmd_metrics(
    pipeline: &InsightPipeline,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let insights = pipeline.compute().await?;
    let tiles = insights.tiles();

    match format {
        OutputFormat::Text => {
            for line in tile_lines(&tiles) {
                writeln!(out, "{}", line)?;
            }
        }
        OutputFormat::Json => {
            let body = json!({
                "tiles": tiles,
                "metrics": insights.metrics,
                "quality": {
                    "deals": insights.deals.quality(),
                    "work_orders": insights.work_orders.quality(),
                },
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        }
    }
    Ok(())
}

async fn cmd_ask(pipeline: &InsightPipeline, question: &str, out: &mut impl Write) -> Result<()> {
    let insights = pipeline.compute().await?;
    for line in insights.answer(question).lines() {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

async fn cmd_chat(pipeline: &InsightPipeline, recompute: bool) -> Result<()> {
    let policy = if recompute {
        RefreshPolicy::Recompute
    } else {
        RefreshPolicy::Reuse
    };

    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let mut presenter = TerminalPresenter::new(stdin.lock(), std::io::stdout().lock());
    if !interactive {
        presenter = presenter.without_prompt();
    }

    let answered = pipeline.serve(&mut presenter, policy).await?;
    info!(answered, "chat session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizintel_core::RawBoard;
    use tempfile::TempDir;

    const DEALS: BoardId = BoardId(11);
    const WORK_ORDERS: BoardId = BoardId(22);

    fn fixtures() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let deals = RawBoard::from_titles(["Deal Value", "Probability", "Sector"])
            .with_item(
                "Acme",
                &[("Deal Value", "1,000"), ("Probability", "high"), ("Sector", "Tech")],
            )
            .with_item(
                "Globex",
                &[("Deal Value", "500"), ("Probability", "low"), ("Sector", "Retail")],
            );
        let work_orders =
            RawBoard::from_titles(["Status"]).with_item("WO-1", &[("Status", "Open")]);

        for (id, board) in [(DEALS, deals), (WORK_ORDERS, work_orders)] {
            std::fs::write(
                dir.path().join(format!("{}.json", id)),
                serde_json::to_vec(&board).unwrap(),
            )
            .unwrap();
        }
        dir
    }

    fn pipeline(dir: &TempDir) -> InsightPipeline {
        InsightPipeline::new(
            Arc::new(FileBoardSource::new(dir.path())),
            Arc::new(SystemClock),
            BoardIds {
                deals: DEALS,
                work_orders: WORK_ORDERS,
            },
        )
    }

    #[test]
    fn test_cli_parses_global_source_flags() {
        let cli = Cli::try_parse_from([
            "bizintel",
            "ask",
            "risk?",
            "--deals-board",
            "42",
            "--fixtures",
            "/tmp/boards",
        ])
        .unwrap();
        assert_eq!(cli.source.deals_board, BoardId(42));
        assert_eq!(cli.source.fixtures, Some(PathBuf::from("/tmp/boards")));
        assert!(matches!(cli.command, Commands::Ask { ref question } if question == "risk?"));
    }

    #[tokio::test]
    async fn test_metrics_text() {
        let dir = fixtures();
        let mut out = Vec::new();
        cmd_metrics(&pipeline(&dir), OutputFormat::Text, &mut out)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Total Pipeline: ₹1500.00\nWeighted Forecast: ₹900.00\nTotal Work Orders: 1\n"
        );
    }

    #[tokio::test]
    async fn test_metrics_json() {
        let dir = fixtures();
        let mut out = Vec::new();
        cmd_metrics(&pipeline(&dir), OutputFormat::Json, &mut out)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(body["tiles"]["total_work_orders"], 1);
        assert_eq!(body["metrics"]["sector_totals"][0]["sector"], "Tech");
    }

    #[tokio::test]
    async fn test_ask_risk() {
        let dir = fixtures();
        let mut out = Vec::new();
        cmd_ask(&pipeline(&dir), "where is our risk?", &mut out)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Risk Exposure Analysis\n- Highest Exposure: Tech\n- Concentration Risk: 66.67%\n"
        );
    }

    #[tokio::test]
    async fn test_missing_board_is_fatal() {
        let dir = fixtures();
        std::fs::remove_file(dir.path().join(format!("{}.json", WORK_ORDERS))).unwrap();
        let err = cmd_ask(&pipeline(&dir), "pipeline", &mut Vec::new())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Board Fetch Failed"));
    }

    #[tokio::test]
    async fn test_auth_against_missing_fixture_dir() {
        let source = FileBoardSource::new("/nonexistent/bizintel-fixtures");
        let err = cmd_auth(&source, &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().starts_with("Authentication Failed"));
    }
}
