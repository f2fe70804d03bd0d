use ai_detector_backend::{
    config::Config,
    detection::Detector,
    evaluation::{LABEL_FAKE, LABEL_REAL, Metrics, collect_dataset},
};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 在带标签的数据集上评估检测器
#[derive(Parser, Debug)]
#[command(name = "evaluate_detector")]
#[command(author, version, about = "Evaluate the image detector on dataset/real and dataset/fake")]
struct Args {
    /// Dataset root containing `real/` and `fake/`
    #[arg(long, default_value = "dataset")]
    dataset: PathBuf,

    /// ONNX model path, defaults to the configured model
    #[arg(long)]
    model: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ai_detector_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut model_config = Config::load_if_exists("config.toml")
        .context("invalid config.toml")?
        .map(|config| config.model)
        .unwrap_or_default();
    if let Some(path) = args.model {
        model_config.path = path;
    }

    let detector = Detector::from_config(&model_config)
        .with_context(|| format!("failed to load model {}", model_config.path))?;

    let samples = collect_dataset(&args.dataset)
        .with_context(|| format!("failed to read dataset {}", args.dataset.display()))?;

    let mut metrics = Metrics::default();
    for (path, label) in samples {
        println!("Testing: {}", path.display());
        match detector.classify_image(&path) {
            Ok(result) => {
                let prediction = if result.is_ai { LABEL_FAKE } else { LABEL_REAL };
                metrics.record(label, prediction);
            }
            Err(e) => tracing::warn!("跳过无法分析的图片 {}: {}", path.display(), e),
        }
    }

    println!("\n{}", metrics);
    Ok(())
}
