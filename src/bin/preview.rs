use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use preview_native::discovery::{expand_inputs, find_page_collision, ComponentSource};
use preview_native::{strip_code_fences, transform_with_options, validate, PreviewOptions};

/// Build sandboxed preview pages for generated components and lint them
#[derive(Debug, Parser)]
#[command(name = "preview")]
#[command(version)]
struct Args {
    /// Component files or directories to scan for .tsx/.jsx files
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Directory the generated pages are written to
    #[arg(long, default_value = "preview-out")]
    out_dir: PathBuf,

    /// JSON file with preview options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only run the validator; exit non-zero if anything is flagged
    #[arg(long)]
    check: bool,

    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    log_level: String,
}

struct FileOutcome {
    path: PathBuf,
    messages: Vec<String>,
    build_error: Option<String>,
}

fn load_options(path: Option<&Path>) -> Result<PreviewOptions> {
    let Some(path) = path else {
        return Ok(PreviewOptions::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let options = PreviewOptions::from_json_str(&json)
        .with_context(|| format!("invalid config {}", path.display()))?;
    options.check()?;
    Ok(options)
}

fn process(input: &ComponentSource, args: &Args, options: &PreviewOptions) -> Result<FileOutcome> {
    let path = input.path.as_path();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let source = strip_code_fences(&raw);
    let report = validate(&source);

    let mut build_error = None;
    if !args.check {
        let artifact = transform_with_options(&source, options);
        build_error = artifact.error.as_ref().map(|e| e.to_string());

        let out_path = args.out_dir.join(&input.page);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&out_path, &artifact.document)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        log::info!("wrote {}", out_path.display());
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        messages: report.messages,
        build_error,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .init();

    let options = load_options(args.config.as_deref())?;
    let files = expand_inputs(&args.paths);
    if files.is_empty() {
        bail!("no .tsx or .jsx sources found");
    }
    if !args.check {
        if let Some((first, second)) = find_page_collision(&files) {
            bail!(
                "{} and {} would both be written to the same page",
                first.display(),
                second.display()
            );
        }
        fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("failed to create {}", args.out_dir.display()))?;
    }

    let outcomes: Vec<Result<FileOutcome>> = files
        .par_iter()
        .map(|input| process(input, &args, &options))
        .collect();

    let mut flagged = 0;
    for outcome in outcomes {
        let outcome = outcome?;
        if let Some(err) = &outcome.build_error {
            println!("{}: Build Error: {}", outcome.path.display(), err);
        }
        if outcome.messages.is_empty() {
            println!("{}: ok", outcome.path.display());
            continue;
        }
        flagged += 1;
        println!("{}:", outcome.path.display());
        for message in &outcome.messages {
            println!("  {}", message);
        }
    }

    if args.check && flagged > 0 {
        bail!("{} file(s) with findings", flagged);
    }
    Ok(())
}
