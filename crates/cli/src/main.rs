// dss CLI - validate decision workbooks and evaluate them remotely

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use dss_cli::render::{render_json, render_result};
use dss_config::Settings;
use dss_evaluator_client::{EvaluatorClient, EvaluatorConfig, EvaluatorError};
use dss_io::IngestError;
use dss_model::{DecisionDocument, KNOWN_MODES};
use dss_workflow::{SelectedFile, Stage, Variant, Workflow, WorkflowError};

use exit_codes::{
    evaluator_exit_code, ingest_exit_code,
    EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "dss")]
#[command(about = "Evaluate decision-model workbooks (.xlsx) with a remote evaluator")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Settings file (default: <config dir>/dss/settings.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a workbook, send it to the evaluator, print the ranking
    #[command(after_help = "\
Workbook layouts:
  weighted  sheets config (modo, alpha), criterios (criterio, peso, tipo),
            alternativas (alternativa, <criterio>...)
  risk      sheets config (modo, criterio, hurwiczAlpha, actualState),
            estados (estado, probabilidad), payoffs (alternativa, <estado>...)

Examples:
  dss evaluate modelo.xlsx --variant weighted
  dss evaluate riesgo.xlsx --variant risk --json
  dss evaluate riesgo.xlsx --variant risk --endpoint http://10.0.0.5:8080")]
    Evaluate {
        /// Workbook to evaluate (.xlsx)
        file: PathBuf,

        /// Workbook layout
        #[arg(long, value_enum)]
        variant: VariantArg,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Also print the request document sent to the evaluator
        #[arg(long)]
        show_request: bool,

        #[command(flatten)]
        evaluator: EvaluatorArgs,
    },

    /// Validate a workbook and print the request document, without sending it
    #[command(after_help = "\
Examples:
  dss inspect modelo.xlsx --variant weighted
  dss inspect riesgo.xlsx --variant risk > request.json")]
    Inspect {
        /// Workbook to read (.xlsx)
        file: PathBuf,

        /// Workbook layout
        #[arg(long, value_enum)]
        variant: VariantArg,
    },

    /// Check that the evaluator is reachable
    Ping {
        #[command(flatten)]
        evaluator: EvaluatorArgs,
    },

    /// List the decision modes the evaluator is known to accept
    Modes,

    /// Settings file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a commented default settings file (never overwrites)
    Init,

    /// Print the effective settings as JSON
    Show,
}

#[derive(Args)]
struct EvaluatorArgs {
    /// Evaluator base URL (overrides evaluator.baseUrl)
    #[arg(long, env = "DSS_EVALUATOR_URL", value_name = "URL")]
    endpoint: Option<String>,

    /// Request timeout in seconds (overrides evaluator.timeoutSecs)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    /// Weighted criteria
    Weighted,
    /// Risk / uncertainty payoff matrix
    Risk,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Weighted => Variant::Weighted,
            VariantArg::Risk => Variant::Risk,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    init_tracing(&settings.log_filter);
    tracing::debug!(config = ?cli.config, base_url = %settings.base_url, "settings loaded");

    let result = match cli.command {
        None => {
            // No subcommand = show usage
            eprintln!("Usage: dss <command> [options]");
            eprintln!("       dss --help for more information");
            Ok(())
        }
        Some(Commands::Evaluate { file, variant, json, show_request, evaluator }) => {
            cmd_evaluate(&settings, &evaluator, &file, variant.into(), json, show_request)
        }
        Some(Commands::Inspect { file, variant }) => cmd_inspect(&file, variant.into()),
        Some(Commands::Ping { evaluator }) => cmd_ping(&settings, &evaluator),
        Some(Commands::Modes) => cmd_modes(),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Init => cmd_config_init(cli.config.as_deref()),
            ConfigCommands::Show => cmd_config_show(&settings),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Log to stderr so stdout stays machine-readable. RUST_LOG wins over the
/// settings file.
fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn ingest(err: &IngestError) -> Self {
        let hint = match err {
            IngestError::MissingSheet { .. } | IngestError::EmptySheet { .. } => {
                Some("is --variant right for this workbook? see `dss evaluate --help`".to_string())
            }
            _ => None,
        };
        Self { code: ingest_exit_code(err), message: err.to_string(), hint }
    }

    pub fn evaluator(err: &EvaluatorError, url: &str) -> Self {
        let hint = match err {
            EvaluatorError::Transport { .. } => {
                Some(format!("is the evaluator running at {}? (--endpoint, evaluator.baseUrl)", url))
            }
            _ => None,
        };
        Self { code: evaluator_exit_code(err), message: err.to_string(), hint }
    }

    pub fn workflow(err: &WorkflowError, url: &str) -> Self {
        match err {
            WorkflowError::Ingest(e) => Self::ingest(e),
            WorkflowError::Evaluator(e) => Self::evaluator(e, url),
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn evaluator_config(settings: &Settings, args: &EvaluatorArgs) -> EvaluatorConfig {
    let mut config = settings.evaluator_config();
    if let Some(endpoint) = &args.endpoint {
        config.base_url = endpoint.clone();
    }
    if let Some(secs) = args.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    config
}

// ============================================================================
// evaluate
// ============================================================================

fn cmd_evaluate(
    settings: &Settings,
    args: &EvaluatorArgs,
    file: &Path,
    variant: Variant,
    json: bool,
    show_request: bool,
) -> Result<(), CliError> {
    let mut workflow = Workflow::new(variant);
    workflow.select_file(SelectedFile::from_path(file));
    if let Some(err) = workflow.error() {
        return Err(CliError::workflow(err, ""));
    }
    if !file.is_file() {
        return Err(CliError::usage(format!("file not found: {}", file.display())));
    }

    let config = evaluator_config(settings, args);
    let client = EvaluatorClient::new(&config);
    let stage = workflow.run(&client);

    let request = if show_request { workflow.document() } else { None };

    match (stage, workflow.result()) {
        (Stage::Success, Some(result)) => {
            if json {
                let mut out = serde_json::Map::new();
                if let Some(doc) = request {
                    out.insert("request".into(), to_json_value(doc)?);
                }
                out.insert("result".into(), to_json_value(result)?);
                let text = if request.is_some() {
                    serde_json::to_string_pretty(&out)
                } else {
                    render_json(result)
                };
                println!("{}", text.map_err(|e| CliError::other(e.to_string()))?);
            } else {
                if let Some(doc) = request {
                    println!("Request:\n{}\n", doc.to_json_pretty());
                }
                print!("{}", render_result(result, workflow.document()));
            }
            Ok(())
        }
        _ => {
            if let Some(doc) = request {
                eprintln!("request:\n{}", doc.to_json_pretty());
            }
            match workflow.error() {
                Some(err) => Err(CliError::workflow(err, &config.base_url)),
                None => Err(CliError::other(format!(
                    "evaluation ended in stage {}",
                    workflow.stage().as_str()
                ))),
            }
        }
    }
}

fn to_json_value<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, CliError> {
    serde_json::to_value(value).map_err(|e| CliError::other(e.to_string()))
}

// ============================================================================
// inspect
// ============================================================================

fn cmd_inspect(file: &Path, variant: Variant) -> Result<(), CliError> {
    let named_xlsx = file
        .file_name()
        .is_some_and(|n| dss_io::is_xlsx_name(&n.to_string_lossy()));
    if named_xlsx && !file.is_file() {
        return Err(CliError::usage(format!("file not found: {}", file.display()))
            .with_hint("inspect reads a local .xlsx file; nothing is sent"));
    }

    let document: DecisionDocument =
        dss_io::ingest_path(file, variant).map_err(|e| CliError::ingest(&e))?;
    println!("{}", document.to_json_pretty());
    Ok(())
}

// ============================================================================
// ping
// ============================================================================

fn cmd_ping(settings: &Settings, args: &EvaluatorArgs) -> Result<(), CliError> {
    let config = evaluator_config(settings, args);
    let client = EvaluatorClient::new(&config);
    let body = client
        .health()
        .map_err(|e| CliError::evaluator(&e, &config.base_url))?;

    if body.is_empty() {
        println!("ok {}", config.health_url());
    } else {
        println!("ok {} ({})", config.health_url(), body);
    }
    Ok(())
}

// ============================================================================
// modes
// ============================================================================

fn cmd_modes() -> Result<(), CliError> {
    for mode in KNOWN_MODES {
        println!("{}", mode);
    }
    Ok(())
}

// ============================================================================
// config
// ============================================================================

fn cmd_config_init(path: Option<&Path>) -> Result<(), CliError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(Settings::config_path);
    let created = Settings::create_default_file(&path).map_err(|e| CliError::other(e.to_string()))?;
    if created {
        println!("created {}", path.display());
    } else {
        println!("exists {}", path.display());
    }
    Ok(())
}

fn cmd_config_show(settings: &Settings) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(settings).map_err(|e| CliError::other(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
