use anyhow::bail;
use clap::Parser;
use dotenvy::dotenv;
use floorplan_intake::{
    CompletionCallback, FsDecoder, IntakeConfig, IntakeEvent, UploadWidget, VisualizerState,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Drive one intake lifecycle against a local image file.
#[derive(Parser)]
#[command(name = "floorplan-intake")]
struct Args {
    /// Image to feed through the widget (.jpg, .jpeg, .png, .webp)
    path: PathBuf,

    /// Project name shown on the visualizer page
    #[arg(long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing with EnvFilter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "floorplan_intake=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = IntakeConfig::from_env();
    info!(
        "📐 Intake config: tick={}ms, step={}, settle={}ms",
        config.tick_interval_ms, config.step_size, config.settle_delay_ms
    );

    let (_auth_tx, auth_rx) = watch::channel(true);
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let on_complete: CompletionCallback = Arc::new(move |payload| {
        let _ = done_tx.send(payload);
    });

    // Worst case: every tick plus the settle delay, with slack for the read.
    let ticks = (100 / config.step_size.max(1) as u64 + 1) * config.tick_interval_ms;
    let deadline = Duration::from_millis(ticks + config.settle_delay_ms) + Duration::from_secs(10);

    let mut widget = UploadWidget::new(config, auth_rx, Arc::new(FsDecoder), on_complete);
    let mut progress = widget.progress_watch();

    let render = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let pct = *progress.borrow();
            info!("progress: {pct}%");
            if pct == 100 {
                break;
            }
        }
    });

    widget
        .handle_event(IntakeEvent::FilePicked(vec![args.path.clone()]))
        .await;

    if widget.snapshot().await.file.is_none() {
        bail!("{} was not accepted by the picker", args.path.display());
    }

    let payload = match tokio::time::timeout(deadline, done_rx.recv()).await {
        Ok(Some(payload)) => payload,
        _ => bail!("intake did not complete; see logs"),
    };
    render.await?;

    info!("✅ Intake complete, {} encoded bytes", payload.len());

    let state = VisualizerState {
        name: args.name,
        initial_image: Some(payload),
        initial_render: None,
    };
    let panes: Vec<_> = state
        .panes()
        .iter()
        .map(|(label, data)| json!({ "label": label, "encoded_len": data.len() }))
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "title": state.title(),
            "panes": panes,
        }))?
    );

    Ok(())
}
