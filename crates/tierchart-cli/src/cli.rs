//! Command-line interface for the tierchart utility
//!
//! Lays out org chart JSON into box/connector geometry, or previews it as
//! text.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use tierchart::chart::levelize;
use tierchart::core::logging::init_logging;
use tierchart::{CharacterSet, ChartConfig, ChartLayoutEngine, ChartParser, ChartRenderer};

/// Tierchart - Lay out organization charts
#[derive(Parser)]
#[command(name = "tierchart")]
#[command(about = "A Rust utility to lay out organization charts as boxes and connectors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (overrides TIERCHART_LOG_LEVEL and RUST_LOG)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (overrides TIERCHART_LOG_FORMAT)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Input, output and layout options shared by `layout` and `render`
#[derive(Args, Debug, Clone, Default)]
pub struct ChartArgs {
    /// Input file containing org chart JSON (use - for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (use - for stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Available width; overrides the config file
    #[arg(short, long)]
    pub width: Option<f64>,

    /// JSON config file; knobs it does not name keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the layout and print it as JSON
    Layout {
        #[command(flatten)]
        chart: ChartArgs,

        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Render a text preview of the chart
    Render {
        #[command(flatten)]
        chart: ChartArgs,

        /// Character set to use for rendering output
        #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
        style: StyleChoice,
    },

    /// Check that the input is a well-formed org chart
    Validate {
        /// Input file to validate (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print the default configuration as JSON
    Defaults,
}

/// Supported output character sets
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Ascii,
    Unicode,
}

impl From<StyleChoice> for CharacterSet {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Ascii => CharacterSet::Ascii,
            StyleChoice::Unicode => CharacterSet::Unicode,
        }
    }
}

/// Main CLI application
pub struct TierchartApp {
    config: ChartConfig,
    parser: ChartParser,
}

impl TierchartApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(ChartConfig::default())
    }

    /// Create an application whose commands start from `config`
    pub fn with_config(config: ChartConfig) -> Self {
        Self {
            config,
            parser: ChartParser::new(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        let level = cli
            .log_level
            .or(cli.verbose.then_some(LogLevel::Debug))
            .map(|level| level.as_str());
        if let Err(e) = init_logging(level, cli.log_format.map(|f| f.as_str())) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Tierchart v{}", env!("CARGO_PKG_VERSION"));
        }

        let verbose = cli.verbose;
        match cli.command {
            Commands::Layout { chart, compact } => self.layout_command(chart, compact, verbose),
            Commands::Render { chart, style } => self.render_command(chart, style, verbose),
            Commands::Validate { input } => self.validate_command(input, verbose),
            Commands::Defaults => self.defaults_command(),
        }
    }

    /// Configuration for one command: base, then config file, then `--width`
    pub fn resolve_config(&self, args: &ChartArgs) -> Result<ChartConfig> {
        let mut config = match &args.config {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
                ChartConfig::from_json(&content)
                    .with_context(|| format!("Invalid config file '{}'", path.display()))?
            }
            None => self.config.clone(),
        };
        if let Some(width) = args.width {
            config = config.with_available_space(width);
        }
        config.validate()?;
        Ok(config)
    }

    /// Lay out `content` and serialize the report
    pub fn layout_json(&self, content: &str, config: ChartConfig, compact: bool) -> Result<String> {
        let root = self.parser.parse(content)?;
        let layout = ChartLayoutEngine::with_cells(config)?.recompute(&root)?;
        let report = layout.to_report()?;
        let json = if compact {
            serde_json::to_string(&report)?
        } else {
            serde_json::to_string_pretty(&report)?
        };
        Ok(json)
    }

    /// Lay out `content` and draw it as text
    pub fn render_text(
        &self,
        content: &str,
        config: ChartConfig,
        style: StyleChoice,
    ) -> Result<String> {
        let root = self.parser.parse(content)?;
        let layout = ChartLayoutEngine::with_cells(config)?.recompute(&root)?;
        Ok(ChartRenderer::with_style(style.into()).render(&layout)?)
    }

    /// Handle the layout command
    fn layout_command(&self, chart: ChartArgs, compact: bool, verbose: bool) -> Result<()> {
        let config = self.resolve_config(&chart)?;
        let content = self.read_input(chart.input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let json = self.layout_json(&content, config, compact)?;
        info!(bytes = json.len(), "Layout written");
        self.write_output(chart.output, &json)
    }

    /// Handle the render command
    fn render_command(&self, chart: ChartArgs, style: StyleChoice, verbose: bool) -> Result<()> {
        let config = self.resolve_config(&chart)?;
        let content = self.read_input(chart.input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let preview = self.render_text(&content, config, style)?;
        if verbose {
            eprintln!("Successfully rendered chart preview");
        }
        self.write_output(chart.output, &preview)
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        match self.validate_summary(&content) {
            Ok(summary) => {
                println!("✓ {}", summary);
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid org chart: {}", e);
                Err(e)
            }
        }
    }

    /// One-line description of a valid chart
    pub fn validate_summary(&self, content: &str) -> Result<String> {
        let root = self.parser.parse(content)?;
        let levels = levelize(&root)?;
        debug!(levels = levels.level_count(), "Validated chart");
        Ok(format!(
            "Valid org chart: {} nodes, {} edges, {} levels",
            levels.node_count(),
            levels.edge_count(),
            levels.level_count()
        ))
    }

    /// Handle the defaults command
    fn defaults_command(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.config)?;
        self.write_output(None, &json)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

impl Default for TierchartApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str =
        r#"{"title": "CEO", "children": [{"title": "CTO"}, {"title": "CFO", "large": true}]}"#;

    #[test]
    fn test_cli_parsing_layout_command() {
        let args = vec![
            "tierchart", "layout", "--input", "chart.json", "--output", "out.json", "--width", "80",
            "--compact",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Layout { chart, compact } => {
                assert_eq!(chart.input.unwrap().to_string_lossy(), "chart.json");
                assert_eq!(chart.output.unwrap().to_string_lossy(), "out.json");
                assert_eq!(chart.width, Some(80.0));
                assert!(chart.config.is_none());
                assert!(compact);
            }
            _ => panic!("Expected Layout command"),
        }
    }

    #[test]
    fn test_cli_parsing_render_style() {
        let args = vec!["tierchart", "render", "--style", "ascii"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Render { style, chart } => {
                assert_eq!(style, StyleChoice::Ascii);
                assert!(chart.input.is_none());
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_parsing_render_default_style() {
        let cli = Cli::try_parse_from(vec!["tierchart", "render"]).unwrap();
        match cli.command {
            Commands::Render { style, .. } => assert_eq!(style, StyleChoice::Unicode),
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_parsing_validate_and_defaults() {
        let cli = Cli::try_parse_from(vec!["tierchart", "validate"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate { input: None }));

        let cli = Cli::try_parse_from(vec!["tierchart", "defaults"]).unwrap();
        assert!(matches!(cli.command, Commands::Defaults));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = vec![
            "tierchart",
            "render",
            "--verbose",
            "--log-level",
            "trace",
            "--log-format",
            "json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_level, Some(LogLevel::Trace));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_invalid_style_rejected() {
        let args = vec!["tierchart", "render", "--style", "neon"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let app = TierchartApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("chart.json");
        fs::write(&file_path, SAMPLE).unwrap();

        let content = app.read_input(Some(file_path)).unwrap();
        assert_eq!(content, SAMPLE);
    }

    #[test]
    fn test_read_missing_file_fails() {
        let app = TierchartApp::new();
        let dir = tempdir().unwrap();
        let err = app.read_input(Some(dir.path().join("missing.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_write_output_to_file() {
        let app = TierchartApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("out.txt");

        app.write_output(Some(file_path.clone()), "preview").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "preview");
    }

    #[test]
    fn test_layout_json_report() {
        let app = TierchartApp::new();
        let json = app.layout_json(SAMPLE, ChartConfig::default(), true).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(value["lines"].as_array().unwrap().len(), 2);
        assert_eq!(value["nodes"][2]["class"], "org-box large");
    }

    #[test]
    fn test_render_text_preview() {
        let app = TierchartApp::new();
        let preview = app.render_text(SAMPLE, ChartConfig::default(), StyleChoice::Ascii).unwrap();
        assert!(preview.contains("CEO"));
        assert!(preview.is_ascii());
    }

    #[test]
    fn test_config_file_and_width_override() {
        let app = TierchartApp::new();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, r#"{"horizontalSpacing": 6, "availableSpace": 90}"#).unwrap();

        let args = ChartArgs {
            config: Some(config_path.clone()),
            ..ChartArgs::default()
        };
        let config = app.resolve_config(&args).unwrap();
        assert_eq!(config.horizontal_spacing, 6.0);
        assert_eq!(config.available_space, 90.0);
        assert_eq!(config.vertical_spacing, ChartConfig::default().vertical_spacing);

        let args = ChartArgs {
            config: Some(config_path),
            width: Some(50.0),
            ..ChartArgs::default()
        };
        assert_eq!(app.resolve_config(&args).unwrap().available_space, 50.0);
    }

    #[test]
    fn test_negative_width_rejected() {
        let app = TierchartApp::new();
        let args = ChartArgs {
            width: Some(-3.0),
            ..ChartArgs::default()
        };
        assert!(app.resolve_config(&args).is_err());
    }

    #[test]
    fn test_validate_summary() {
        let app = TierchartApp::new();
        let summary = app.validate_summary(SAMPLE).unwrap();
        assert_eq!(summary, "Valid org chart: 3 nodes, 2 edges, 2 levels");
        assert!(app.validate_summary(r#"{"subtitle": "x"}"#).is_err());
    }
}
