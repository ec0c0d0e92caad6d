//! DermaSense CLI
//!
//! Runs the skin lesion classifier offline, without the HTTP service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use dermasense::backend::{backend_name, default_device, InferenceBackend};
use dermasense::inference::{BurnEngine, Diagnoser, InferenceEngine};
use dermasense::knowledge::CLASS_LABELS;
use dermasense::model::{LoadTier, ModelLoader, DEFAULT_MODEL_PATH};
use dermasense::utils::logging::{init_logging, LogConfig};

/// Image extensions picked up when the input is a directory
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// DermaSense skin lesion classification
#[derive(Parser, Debug)]
#[command(name = "dermasense")]
#[command(version)]
#[command(about = "Skin lesion classification with Burn", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Diagnose a single image or every image in a directory
    Infer {
        /// Path to input image or directory
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the trained model artifact
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Pretrained MobileNetV2 feature weights for the rebuild fallback
        #[arg(short, long)]
        backbone: Option<PathBuf>,
    },

    /// Load the model and check its output width against the label table
    Labels {
        /// Path to the trained model artifact
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Pretrained MobileNetV2 feature weights for the rebuild fallback
        #[arg(short, long)]
        backbone: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };

    let _ = init_logging(&log_config);

    match cli.command {
        Commands::Infer {
            input,
            model,
            backbone,
        } => cmd_infer(&input, &model, backbone),
        Commands::Labels { model, backbone } => cmd_labels(&model, backbone),
    }
}

fn load_engine(model: &Path, backbone: Option<PathBuf>) -> BurnEngine<InferenceBackend> {
    let device = default_device();
    let loader = ModelLoader::new(model).with_backbone(backbone);
    info!("Loading classifier from {:?}", loader.artifact_path());
    let artifact = loader.load::<InferenceBackend>(&device);
    BurnEngine::new(artifact, device)
}

fn print_tier(tier: LoadTier) {
    let text = format!("{} model", tier);
    match tier {
        LoadTier::Trained => println!("  Model tier: {}", text.green()),
        LoadTier::Rebuilt => println!("  Model tier: {} (untrained head)", text.yellow()),
        LoadTier::Minimal => println!("  Model tier: {} (predictions not meaningful)", text.red()),
    }
}

fn collect_images(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(input)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn cmd_infer(input: &Path, model: &Path, backbone: Option<PathBuf>) -> Result<()> {
    info!("Running inference on {:?}", input);

    println!("{}", "Inference Configuration:".cyan().bold());
    println!("  Input:   {}", input.display());
    println!("  Model:   {}", model.display());
    println!("  Backend: {}", backend_name());

    if !input.exists() {
        anyhow::bail!("Input path not found: {}", input.display());
    }

    let engine = Arc::new(load_engine(model, backbone));
    print_tier(engine.tier());
    println!();

    let diagnoser = Diagnoser::new(engine);
    let files = collect_images(input)?;
    if files.is_empty() {
        println!("{} No images found in {}", "Warning:".yellow(), input.display());
        return Ok(());
    }

    for file in &files {
        match diagnoser.diagnose(file) {
            Ok(diagnosis) => {
                println!("{}", file.display().to_string().bold());
                let label = if diagnosis.degraded {
                    diagnosis.label.yellow()
                } else {
                    diagnosis.label.green()
                };
                println!("  Disease:     {}", label);
                println!("  Confidence:  {:.2}%", diagnosis.confidence);
                println!("  Description: {}", diagnosis.record.description);
                println!("  Cause:       {}", diagnosis.record.cause);
                println!("  Treatment:   {}", diagnosis.record.treatment);
                println!();
            }
            Err(e) => {
                println!("{} {}: {}", "Error:".red(), file.display(), e);
            }
        }
    }

    Ok(())
}

fn cmd_labels(model: &Path, backbone: Option<PathBuf>) -> Result<()> {
    let engine = load_engine(model, backbone);

    println!("{}", "Label Check:".cyan().bold());
    println!("  Model: {}", model.display());
    print_tier(engine.tier());

    let width = engine.num_classes();
    if width != CLASS_LABELS.len() {
        println!(
            "{} model has {} outputs but there are {} labels",
            "Mismatch:".red(),
            width,
            CLASS_LABELS.len()
        );
        return Ok(());
    }

    println!(
        "  {} {} outputs match {} labels",
        "OK".green(),
        width,
        CLASS_LABELS.len()
    );
    println!();
    for (index, label) in CLASS_LABELS.iter().enumerate() {
        println!("  {:>2}: {}", index, label);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-image.jpg");

        let err = cmd_infer(&missing, Path::new(DEFAULT_MODEL_PATH), None).unwrap_err();
        assert!(err.to_string().contains("Input path not found"));
    }

    #[test]
    fn test_collect_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.JPG", "a.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = collect_images(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.JPG"]);
    }
}
