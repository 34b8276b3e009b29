//! Command-line front end for the highlight-reel pipeline: samples
//! keyframes from a local video, runs them through a vision model, composes
//! a highlight reel, and writes it back out next to the source.

mod orchestrator;

use std::path::PathBuf;

use clap::Parser;
use clutchreel_core::helpers::time::format_duration;
use clutchreel_core::PipelineConfig;

use orchestrator::PipelineOrchestrator;

/// Turn a gameplay recording into a short highlight reel.
#[derive(Parser)]
#[command(name = "clutchreel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sample, analyze, and assemble a highlight reel from a local video file")]
struct Cli {
    /// Path to the source video (MP4, MKV, WebM, AVI, MOV).
    input: PathBuf,

    /// Where to write the assembled reel. Defaults next to the input file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Vision-API bearer credential. Falls back to $CLUTCHREEL_API_KEY — never logged.
    #[arg(long, env = "CLUTCHREEL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the vision API.
    #[arg(long, default_value = "https://api-inference.example.com")]
    endpoint: String,

    /// Comma-separated model fallback list, tried in order.
    #[arg(long, value_delimiter = ',')]
    models: Vec<String>,

    /// Target reel length in seconds.
    #[arg(long)]
    target_duration: Option<f64>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let api_key = cli.api_key.ok_or_else(|| anyhow::anyhow!("credential not set: pass --api-key or set CLUTCHREEL_API_KEY"))?;

    let mut config = PipelineConfig::default();
    if !cli.models.is_empty() {
        config.vision.models = cli.models;
    }
    if let Some(target) = cli.target_duration {
        config.director.target_duration = target;
    }

    let orchestrator = PipelineOrchestrator::new(config);

    let (blob, stats) = orchestrator.run(
        &cli.input,
        &api_key,
        &cli.endpoint,
        |event| println!("[{}] {}%", event.stage, event.progress),
        |message| log::info!("{message}"),
    )?;

    let output_path = cli.output.unwrap_or_else(|| default_output_path(&cli.input));
    std::fs::write(&output_path, &blob.bytes)?;

    println!("wrote {} ({} bytes, {})", output_path.display(), blob.bytes.len(), blob.mime);
    println!(
        "{} clips, {} total, quality {:.0}, took {}",
        stats.clip_count,
        format_duration(stats.total_duration),
        stats.quality_score,
        format_duration(stats.processing_time.as_secs_f64()),
    );
    for s in &stats.suggestions {
        println!("suggestion: {s}");
    }
    for w in &stats.warnings {
        println!("warning: {w}");
    }

    Ok(())
}

fn default_output_path(input: &std::path::Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("reel");
    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("mp4");
    input.with_file_name(format!("{stem}_highlights.{ext}"))
}
