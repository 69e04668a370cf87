//! radiusdemo - multi-radius demographic reports
//!
//! A CLI tool that loads block group boundaries and census tables, classifies
//! the block groups into radii around a point, and writes a per-radius
//! demographic report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing input, unreadable file, bad config, etc.)

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use radiusdemo::analysis::analyze;
use radiusdemo::cli::{Args, OutputFormat};
use radiusdemo::config::{Config, DEFAULT_CONFIG_FILE};
use radiusdemo::context::DataContext;
use radiusdemo::diagnostics::Diagnostics;
use radiusdemo::loader;
use radiusdemo::models::Center;
use radiusdemo::report::{self, Report, ReportMetadata};
use radiusdemo::spatial::{classify, AreaUnitIndex};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("radiusdemo v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .radiusdemo.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set data files, radii, and projection years.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Spinner shown while a step runs, unless --quiet.
fn spinner(args: &Args, message: &str) -> Option<ProgressBar> {
    if args.quiet {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn finish(pb: Option<ProgressBar>, message: String) {
    if let Some(pb) = pb {
        pb.finish_with_message(message);
    }
}

/// Run the complete workflow. Returns the process exit code.
fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let (Some(lat), Some(lng)) = (args.lat, args.lng) else {
        anyhow::bail!("Both --lat and --lng are required");
    };
    let center = Center::new(lat, lng);

    // Step 1: Load the boundary index
    let units_path = config
        .data
        .units
        .clone()
        .context("No area unit file given (use --units or [data].units in the config)")?;
    let pb = spinner(&args, "Loading area unit boundaries...");
    let loaded = loader::load_units(Path::new(&units_path), &config.data.id_property)
        .with_context(|| format!("Failed to load area units from {}", units_path))?;
    finish(pb, format!("Loaded {} area units", loaded.index.len()));
    if !loaded.diagnostics.is_empty() {
        warn!("{} features skipped while loading", loaded.diagnostics.len());
    }

    // Handle --dry-run: classify and exit
    if args.dry_run {
        return handle_dry_run(&loaded.index, center, &config.analysis.radii);
    }

    // Step 2: Load the attribute tables
    let units_in_index = loaded.index.len();
    let mut ctx = DataContext::new().with_units(loaded.index);

    if let Some(ref path) = config.data.demographics {
        let pb = spinner(&args, "Loading demographic table...");
        let table = loader::load_demographics(Path::new(path))
            .with_context(|| format!("Failed to load demographics from {}", path))?;
        finish(pb, format!("Loaded {} demographic rows", table.len()));
        ctx = ctx.with_demographics(table);
    } else {
        warn!("No demographic table given; every radius will be estimated");
    }

    if let Some(ref path) = config.data.rates {
        let pb = spinner(&args, "Loading rate table...");
        let table = loader::load_rates(Path::new(path))
            .with_context(|| format!("Failed to load rates from {}", path))?;
        finish(pb, format!("Loaded {} rate rows", table.len()));
        ctx = ctx.with_rates(table);
    }

    // Step 3: Analyze
    println!("\n🔬 Analyzing radii around {}...", center);
    let analysis = analyze(
        &ctx,
        center,
        &config.analysis.radii,
        &config.analysis.options(),
    )?;

    // Step 4: Build and save the report
    let duration = start_time.elapsed().as_secs_f64();
    let report = Report {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            center,
            radii: analysis.radii.clone(),
            units_in_index,
            duration_seconds: duration,
        },
        analysis,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let output_path = config.output_path(args.format);
    report::write_report(&output, &output_path)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Radius Summary:");
    for summary in &report.analysis.summaries {
        println!(
            "   {:>8}: {:>7} units | population {:>10} | median income {:>9}{}",
            summary.label,
            summary.member_count,
            report::generator::format_count(summary.population),
            report::generator::format_currency(summary.median_income),
            if summary.estimated { "  (estimated)" } else { "" }
        );
    }
    print_diagnostics(&report.analysis.diagnostics);
    println!("   Duration: {:.2}s", duration);
    println!(
        "\n✅ Report saved to: {}",
        output_path.display()
    );

    Ok(0)
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        return;
    }
    println!("\n⚠️  Data notes:");
    for (kind, count) in diagnostics.counts() {
        println!("   - {}: {}", kind, count);
    }
}

/// Handle --dry-run: classify the index, print membership, exit.
fn handle_dry_run(index: &AreaUnitIndex, center: Center, radii: &[f64]) -> Result<i32> {
    println!("\n🔍 Dry run: classifying area units (no aggregation)...\n");

    let mut diagnostics = Diagnostics::new();
    let classification = classify(index, center, radii, &mut diagnostics)?;

    for members in &classification.by_radius {
        println!(
            "   {:>8}: {} units",
            members.label,
            members.identifiers.len()
        );
    }
    println!("\n   Union: {} units", classification.all_identifiers.len());
    print_diagnostics(&diagnostics);

    println!("\n✅ Dry run complete. No tables were read.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
