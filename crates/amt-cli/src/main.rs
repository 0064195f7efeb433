//! AMT flat file generator binary.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use amt_flatten::{flatfile, flatten_release, BrandPolicy, FlattenConfig};

/// Transforms an unzipped SNOMED CT-AU release bundle into the AMT flat
/// file, plus optional replacement and validation report outputs.
#[derive(Debug, Parser)]
#[command(name = "amt2flatfile", version, about)]
struct Args {
    /// Directory containing the unzipped release bundle (snapshot files).
    #[arg(short, long)]
    input: PathBuf,

    /// Output path for the flat file CSV.
    #[arg(short, long)]
    output: PathBuf,

    /// Output path for the replacements CSV listing inactive concepts and
    /// their active replacements. Not written unless requested.
    #[arg(short, long)]
    replacements_output: Option<PathBuf>,

    /// Output path for the JSON validation report.
    #[arg(short = 'j', long, default_value = "ValidationErrors.json")]
    report: PathBuf,

    /// Abort on the first detected error instead of repairing or skipping.
    #[arg(short = 'e', long)]
    strict: bool,

    /// Resolve a branded unit's brand through the hierarchy when it has no
    /// direct brand relationship.
    #[arg(long)]
    tpuu_brand_fallback: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    info!(input = %args.input.display(), "input release directory");
    info!(output = %args.output.display(), "flat file output");

    if args.strict {
        info!("flat file generation will be aborted if any errors are detected");
    } else {
        warn!(
            "configured to continue regardless of detected errors; useful for testing \
             pre-release content but the resulting flat file may be unreliable. \
             Consider rerunning with --strict"
        );
    }

    let config = FlattenConfig {
        strict: args.strict,
        tpuu_brand: if args.tpuu_brand_fallback {
            BrandPolicy::AncestorFallback
        } else {
            BrandPolicy::DirectEdge
        },
    };

    let outcome = flatten_release(&args.input, &config)
        .with_context(|| format!("failed to flatten release at {}", args.input.display()))?;

    flatfile::write_flat_file_path(&args.output, &outcome.rows)
        .with_context(|| format!("failed writing flat file to {}", args.output.display()))?;
    info!(rows = outcome.rows.len(), output = %args.output.display(), "wrote flat file");

    match &args.replacements_output {
        Some(path) => {
            flatfile::write_replacements_path(path, &outcome.cache)
                .with_context(|| format!("failed writing replacements to {}", path.display()))?;
            info!(
                replacements = outcome.cache.replacements().len(),
                output = %path.display(),
                "wrote replacements file"
            );
        }
        None => info!("replacements file was not requested and will not be written"),
    }

    if let Some(parent) = args.report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating report directory {}", parent.display()))?;
        }
    }
    let report_file = fs::File::create(&args.report)
        .with_context(|| format!("failed creating report file {}", args.report.display()))?;
    serde_json::to_writer_pretty(report_file, &outcome.report)
        .context("failed serializing validation report")?;
    info!(
        failures = outcome.report.failure_count(),
        output = %args.report.display(),
        "wrote validation report"
    );

    Ok(())
}
