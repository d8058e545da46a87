use crate::change::Baseline;
use crate::config::DocsConfig;
use crate::detector::FrameworkDetector;
use crate::extractor::ControllerParser;
use crate::model::{ChangeStatus, ControllerRecord};
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use crate::serializer::{load_baseline, serialize_json, serialize_yaml, write_to_file};
use crate::type_resolver::TypeResolver;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// API docs from source - Extract API documentation and change status from Rust controllers
#[derive(Parser, Debug)]
#[command(name = "apidocs-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Output of a previous run to classify changes against
    #[arg(short = 'b', long = "baseline", value_name = "FILE")]
    pub baseline_path: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Document public methods of unmarked controllers too
    #[arg(long = "auto-generate")]
    pub auto_generate: bool,

    /// Specify the routing conventions to apply (if not specified, auto-detect)
    #[arg(short = 'w', long = "framework", value_enum)]
    pub framework: Option<Framework>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Supported routing conventions
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash)]
pub enum Framework {
    /// Actix-Web route macros
    #[value(name = "actix-web")]
    ActixWeb,
    /// Markers and doc comments only
    Plain,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    for path in [&args.baseline_path, &args.config_path].into_iter().flatten() {
        if !path.is_file() {
            anyhow::bail!("File does not exist: {}", path.display());
        }
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if let Some(ref baseline) = args.baseline_path {
        info!("Baseline: {}", baseline.display());
    }
    if let Some(ref framework) = args.framework {
        info!("Framework: {:?}", framework);
    } else {
        info!("Framework: auto-detect");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting API docs extraction...");

    // Step 1: Load configuration
    let mut config = match &args.config_path {
        Some(path) => DocsConfig::load(path)?,
        None => DocsConfig::default(),
    };
    if args.auto_generate {
        config.auto_generate = true;
    }
    debug!("Configuration: {:?}", config);

    // Step 2: Scan directory for Rust files
    info!("Scanning project directory...");
    let scan_result = FileScanner::new(args.project_path.clone())
        .with_exclude_dirs(config.exclude_dirs.clone())
        .scan()?;

    info!("Found {} Rust files", scan_result.rust_files.len());
    if scan_result.rust_files.is_empty() {
        anyhow::bail!("No Rust files found in the project directory");
    }

    // Step 3: Parse files into AST
    info!("Parsing Rust files...");
    let parsed_files: Vec<ParsedFile> = AstParser::parse_files(&scan_result.rust_files)
        .into_iter()
        .filter_map(|r| match r {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Skipping file due to parse error: {}", e);
                None
            }
        })
        .collect();

    info!("Successfully parsed {} files", parsed_files.len());
    if parsed_files.is_empty() {
        anyhow::bail!("No files could be parsed successfully");
    }

    // Step 4: Choose routing conventions
    let framework = match args.framework {
        Some(framework) => {
            info!("Using user-specified framework: {:?}", framework);
            framework
        }
        None => {
            info!("Detecting web frameworks...");
            FrameworkDetector::detect(&parsed_files).primary()
        }
    };

    // Step 5: Load the baseline
    let baseline = match &args.baseline_path {
        Some(path) => load_baseline(path)?,
        None => Baseline::empty(),
    };

    // Step 6: Extract controllers
    info!("Extracting controllers...");
    let resolver = TypeResolver::new(parsed_files.clone())
        .with_collections(config.collection_types.clone());
    let parser = FrameworkDetector::apply_hooks(
        ControllerParser::new(config, baseline, Box::new(resolver)),
        framework,
    );
    let controllers = parser.parse_all(&parsed_files);

    if controllers.is_empty() {
        warn!("No documented controllers found in the project");
    }

    // Step 7: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&controllers)?,
        OutputFormat::Json => serialize_json(&controllers)?,
    };

    // Step 8: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    // Step 9: Display summary
    let summary = ChangeSummary::of(&controllers);
    info!("Extraction complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", scan_result.rust_files.len());
    info!("  - Controllers: {}", controllers.len());
    info!("  - Requests: {}", summary.total());
    info!("  - New: {}", summary.new);
    info!("  - Modified: {}", summary.modified);
    info!("  - Unchanged: {}", summary.unchanged);

    Ok(())
}

/// Request counts per change status
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub new: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl ChangeSummary {
    pub fn of(controllers: &[ControllerRecord]) -> Self {
        let mut summary = Self::default();
        for request in controllers.iter().flat_map(|c| &c.requests) {
            match request.change_status {
                ChangeStatus::New => summary.new += 1,
                ChangeStatus::Modified => summary.modified += 1,
                ChangeStatus::Unchanged => summary.unchanged += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.new + self.modified + self.unchanged
    }
}
