mod logging;
mod render;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracefall_client::ApiClient;
use tracefall_core::aggregate::trace_info_with_orphans;
use tracefall_core::classify::classify;
use tracefall_core::config::Config;
use tracefall_core::error::TracefallError;
use tracefall_core::filter::{SearchFilter, SearchQuery};
use tracefall_core::model::TraceSplitResults;
use tracefall_waterfall::{ViewAction, ViewState, flatten_trace};
use tracing::debug;

use crate::logging::init_cli_tracing;
use crate::render::{RenderOptions, render_summary, render_waterfall, trace_report};

#[derive(Parser, Debug)]
#[command(name = "tracefall")]
#[command(about = "Terminal waterfall viewer for monitoring traces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    json: bool,

    #[arg(
        long,
        global = true,
        help = "Read the trace payload from a JSON file instead of the API ('-' for stdin)"
    )]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Render a trace as a waterfall")]
    View {
        trace_id: String,
        #[arg(long, help = "Regex matched against transaction op and name")]
        search: Option<String>,
        #[arg(long = "where", help = "field=glob filter (op, name, project)")]
        where_filters: Vec<String>,
        #[arg(long, help = "Collapse the subtree under this event id")]
        collapse: Vec<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, help = "Bar track width in terminal cells")]
        width: Option<usize>,
    },
    #[command(about = "Classify a trace and print aggregate stats")]
    Summary {
        trace_id: String,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_cli_tracing();
    let cli = Cli::parse();
    let cfg = Config::load().context("load configuration")?;

    match cli.command {
        Commands::View {
            trace_id,
            search,
            where_filters,
            collapse,
            limit,
            width,
        } => {
            if width == Some(0) {
                return Err(
                    TracefallError::InvalidArgument("--width must be positive".to_string()).into(),
                );
            }

            let split = load_trace(&cfg, cli.file.as_deref(), &trace_id, limit).await?;
            let trace_type =
                classify(&split.transactions, &split.orphan_errors).context("classify trace")?;
            let info = trace_info_with_orphans(&split.transactions, &split.orphan_errors);

            let filters = where_filters
                .iter()
                .map(|f| SearchFilter::parse(f))
                .collect::<tracefall_core::Result<Vec<_>>>()?;
            let query = SearchQuery::new(filters, search.as_deref())?;

            let mut view = ViewState::new();
            if let Some(ids) = query.filtered_event_ids(&split.transactions, &split.orphan_errors)
            {
                view.dispatch(ViewAction::SetFilter(ids));
            }
            for event_id in collapse {
                view.dispatch(ViewAction::Collapse(event_id));
            }

            let flat = flatten_trace(&split.transactions, &split.orphan_errors, &view);

            if cli.json {
                let report = trace_report(&trace_id, trace_type, info.as_ref(), &flat);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let opts = RenderOptions {
                    track_width: width.unwrap_or(cfg.track_width),
                    color: std::io::stdout().is_terminal(),
                };
                print!(
                    "{}",
                    render_waterfall(&trace_id, trace_type, info.as_ref(), &flat, &opts)
                );
            }
            Ok(())
        }
        Commands::Summary { trace_id, limit } => {
            let split = load_trace(&cfg, cli.file.as_deref(), &trace_id, limit).await?;
            let trace_type =
                classify(&split.transactions, &split.orphan_errors).context("classify trace")?;
            let info = trace_info_with_orphans(&split.transactions, &split.orphan_errors);

            if cli.json {
                let payload = serde_json::json!({
                    "trace_id": trace_id,
                    "trace_type": trace_type,
                    "info": info,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print!("{}", render_summary(&trace_id, trace_type, info.as_ref()));
            }
            Ok(())
        }
    }
}

async fn load_trace(
    cfg: &Config,
    file: Option<&Path>,
    trace_id: &str,
    limit: Option<usize>,
) -> anyhow::Result<TraceSplitResults> {
    if let Some(path) = file {
        debug!(path = %path.display(), "loading trace payload from file");
        let raw = if path == Path::new("-") {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("read trace payload from stdin")?;
            raw
        } else {
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("read {}", path.display()))?
        };
        return serde_json::from_str(&raw).context("parse trace payload");
    }

    let client = ApiClient::new(cfg)?;
    let limit = limit.unwrap_or(cfg.trace_limit);
    Ok(client.fetch_trace(trace_id, limit).await?)
}
