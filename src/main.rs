//! emovision - Command-line entry point
//!
//! Loads the emotion model from a URL (with a live progress display) and
//! classifies a single image, printing the predicted label and the per-class
//! percentage breakdown.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use emovision::loader::LoadPhase;
use emovision::pipeline::{ClassifierConfig, ClassifierContext};
use emovision::utils::load_image;

#[derive(Parser, Debug)]
#[command(name = "emovision", version, about = "Classify the emotional tone of an image")]
struct Args {
    /// Path to the image to classify
    image: PathBuf,

    /// URL of the gzip-compressed ONNX model
    #[arg(long)]
    model_url: String,

    /// Optional JSON configuration file overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn render_phase(phase: LoadPhase) {
    match phase {
        LoadPhase::Fetching(progress) => match progress.percent() {
            Some(percent) => eprint!("\rdownloading model: {percent:3.0}%"),
            None => eprint!("\rdownloading model: {} bytes", progress.received),
        },
        LoadPhase::Decompressing => eprint!("\rdecompressing model...   "),
        LoadPhase::BuildingSession => eprint!("\rbuilding session...      "),
        LoadPhase::Ready => eprintln!("\rmodel ready              "),
    }
    let _ = std::io::stderr().flush();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    emovision::core::init_tracing();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ClassifierConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ClassifierConfig::default(),
    };
    config.model_url = args.model_url;

    let context = ClassifierContext::new(config)?;
    context.load_with_progress(render_phase).await?;

    let image = load_image(&args.image)?;
    let result = context.classify(&image)?;

    println!("{}", result.label);
    for (label, probability) in context.labels().iter().zip(&result.probabilities) {
        println!("{label}: {:.2}%", probability * 100.0);
    }

    Ok(())
}
