//! Wellness CLI - Command-line interface for Screen Wellness
//!
//! Commands:
//! - analyze: Score a usage snapshot
//! - serve: Run the HTTP API (requires the `server` feature)
//! - doctor: Diagnose configuration
//! - schema: Print input/output schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use screen_wellness::config::{InsightConfig, ServerConfig};
use screen_wellness::{
    parse_snapshot, AnalysisResult, InsightService, WellnessAnalyzer, WellnessReportEncoder,
    PRODUCER_NAME, WELLNESS_VERSION,
};

/// Wellness - Score a day of screen time and app usage
#[derive(Parser)]
#[command(name = "wellness")]
#[command(version = WELLNESS_VERSION)]
#[command(about = "Turn daily usage telemetry into a wellness score", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a usage snapshot
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        format: OutputFormat,

        /// Attach a natural-language insight
        #[arg(long)]
        insight: bool,

        /// Use the local insight template even if an API key is set
        #[arg(long)]
        mock: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Bind address (overrides WELLNESS_BIND)
        #[arg(long)]
        bind: Option<String>,

        /// Static asset directory (overrides WELLNESS_STATIC_DIR)
        #[arg(long)]
        static_dir: Option<String>,

        /// Use the local insight template even if an API key is set
        #[arg(long)]
        mock: bool,
    },

    /// Diagnose configuration
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact analysis JSON
    Json,
    /// Pretty-printed analysis JSON
    JsonPretty,
    /// Human-readable summary
    Text,
    /// Report envelope with producer metadata
    Report,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Usage snapshot
    Input,
    /// Analysis result
    Output,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("screen_wellness=info,wellness=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), WellnessCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            format,
            insight,
            mock,
        } => cmd_analyze(&input, &output, format, insight, mock),

        Commands::Serve {
            bind,
            static_dir,
            mock,
        } => cmd_serve(bind, static_dir, mock),

        Commands::Doctor { json } => cmd_doctor(json),

        Commands::Schema { schema_type } => cmd_schema(schema_type),
    }
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    with_insight: bool,
    mock: bool,
) -> Result<(), WellnessCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let snapshot = parse_snapshot(&input_data)?;
    let analysis = WellnessAnalyzer::new().analyze(&snapshot);

    let insight = with_insight.then(|| {
        let mut config = InsightConfig::from_env();
        config.use_mock |= mock;
        InsightService::from_config(&config).generate(&analysis, &snapshot)
    });

    let output_data = match format {
        OutputFormat::Json => serde_json::to_string(&merge_insight(&analysis, insight)?)?,
        OutputFormat::JsonPretty => {
            serde_json::to_string_pretty(&merge_insight(&analysis, insight)?)?
        }
        OutputFormat::Text => format_text(&analysis, insight.as_deref()),
        OutputFormat::Report => {
            WellnessReportEncoder::new().encode_to_json(&snapshot, analysis, insight)?
        }
    };

    if output.to_string_lossy() == "-" {
        println!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

#[cfg(feature = "server")]
fn cmd_serve(
    bind: Option<String>,
    static_dir: Option<String>,
    mock: bool,
) -> Result<(), WellnessCliError> {
    let mut config = ServerConfig::from_env();
    if let Some(bind) = bind {
        config.bind_address = bind;
    }
    if let Some(dir) = static_dir {
        config.static_dir = dir;
    }
    config.insight.use_mock |= mock;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(screen_wellness::server::start_server(config))
        .map_err(|e| WellnessCliError::Server(e.to_string()))
}

#[cfg(not(feature = "server"))]
fn cmd_serve(
    _bind: Option<String>,
    _static_dir: Option<String>,
    _mock: bool,
) -> Result<(), WellnessCliError> {
    Err(WellnessCliError::ServerDisabled)
}

fn cmd_doctor(json: bool) -> Result<(), WellnessCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Screen Wellness version {}", WELLNESS_VERSION),
    });

    let insight_config = InsightConfig::from_env();
    let insight_check = if insight_config.use_mock {
        DoctorCheck {
            name: "insight".to_string(),
            status: CheckStatus::Ok,
            message: "Local template forced by WELLNESS_INSIGHT_MOCK".to_string(),
        }
    } else if insight_config.api_key.is_some() {
        DoctorCheck {
            name: "insight".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "Networked insights enabled ({} at {})",
                insight_config.model, insight_config.base_url
            ),
        }
    } else {
        DoctorCheck {
            name: "insight".to_string(),
            status: CheckStatus::Warning,
            message: "OPENAI_API_KEY not set; insights use the local template".to_string(),
        }
    };
    checks.push(insight_check);

    checks.push(DoctorCheck {
        name: "server".to_string(),
        status: if cfg!(feature = "server") {
            CheckStatus::Ok
        } else {
            CheckStatus::Warning
        },
        message: if cfg!(feature = "server") {
            format!("HTTP server available (bind {})", ServerConfig::from_env().bind_address)
        } else {
            "Built without the `server` feature".to_string()
        },
    });

    let static_dir = ServerConfig::from_env().static_dir;
    checks.push(static_dir_check(Path::new(&static_dir), cfg!(feature = "server")));

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (ready for `analyze -i -`)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: WELLNESS_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Wellness Doctor Report");
        println!("======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(WellnessCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

/// The server falls back to this directory for every non-API route, so a
/// missing one is fatal only when the server is built in
fn static_dir_check(dir: &Path, serving: bool) -> DoctorCheck {
    let (status, message) = if dir.is_dir() {
        (
            CheckStatus::Ok,
            format!("Static assets served from {}", dir.display()),
        )
    } else {
        let message = format!("Static directory {} does not exist", dir.display());
        if serving {
            (CheckStatus::Error, message)
        } else {
            (CheckStatus::Warning, message)
        }
    };

    DoctorCheck {
        name: "static_dir".to_string(),
        status,
        message,
    }
}

fn cmd_schema(schema_type: SchemaType) -> Result<(), WellnessCliError> {
    match schema_type {
        SchemaType::Input => {
            println!("Input: usage snapshot (JSON object, every field optional)");
            println!();
            println!("- date: \"YYYY-MM-DD\" (echoed in reports, not scored)");
            println!("- total_screen_time_minutes: integer >= 0 (default 0)");
            println!("- apps: array of");
            println!("  - name: string (default \"Unknown\")");
            println!("  - category: string (default \"other\"; productivity, social, entertainment are recognized)");
            println!("  - minutes: integer >= 0 (default 0)");
            println!("- sessions: array of");
            println!("  - start_hour, end_hour: integer hour of day (default 0)");
            println!("  - minutes: integer (default (end_hour - start_hour) * 60)");
        }
        SchemaType::Output => {
            println!("Output: analysis result");
            println!();
            println!("- overall_score: 0-100, one decimal");
            println!("- breakdown: {{ screen_time, diversity, timing, balance, breaks }}");
            println!("- tags: ordered behavioral labels (balanced, moderate, needs-attention, ...)");
            println!("- patterns: ordered observation strings");
            println!("- metrics: {{ total_screen_time_hours, app_count, session_count }}");
            println!("- llm_insight: string (only when an insight was requested)");
        }
    }

    Ok(())
}

// Helper functions

fn merge_insight(
    analysis: &AnalysisResult,
    insight: Option<String>,
) -> Result<serde_json::Value, WellnessCliError> {
    let mut value = serde_json::to_value(analysis)?;
    if let (Some(text), Some(map)) = (insight, value.as_object_mut()) {
        map.insert("llm_insight".to_string(), serde_json::Value::String(text));
    }
    Ok(value)
}

fn format_text(analysis: &AnalysisResult, insight: Option<&str>) -> String {
    let mut lines = vec![
        format!("Overall Wellness Score: {:.1}/100", analysis.overall_score),
        String::new(),
        "Score Breakdown:".to_string(),
    ];
    for (name, score) in analysis.breakdown.entries() {
        lines.push(format!("  - {}: {:.1}/100", title_case(name), score));
    }

    lines.push(String::new());
    lines.push("Behavioral Tags:".to_string());
    lines.push(
        analysis
            .tags
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    );

    lines.push(String::new());
    lines.push("Detected Patterns:".to_string());
    for pattern in &analysis.patterns {
        lines.push(format!("  - {}", pattern));
    }

    lines.push(String::new());
    lines.push("Quick Metrics:".to_string());
    lines.push(format!(
        "  - Total Screen Time: {:.1} hours",
        analysis.metrics.total_screen_time_hours
    ));
    lines.push(format!("  - Apps Used: {}", analysis.metrics.app_count));
    lines.push(format!("  - Sessions: {}", analysis.metrics.session_count));

    if let Some(text) = insight {
        lines.push(String::new());
        lines.push("Insight:".to_string());
        lines.push(text.to_string());
    }

    lines.join("\n")
}

/// `screen_time` -> `Screen Time`
fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// Error types

#[derive(Debug)]
enum WellnessCliError {
    Io(io::Error),
    Analysis(screen_wellness::WellnessError),
    Json(serde_json::Error),
    DoctorFailed,
    #[cfg_attr(not(feature = "server"), allow(dead_code))]
    Server(String),
    #[cfg_attr(feature = "server", allow(dead_code))]
    ServerDisabled,
}

impl From<io::Error> for WellnessCliError {
    fn from(e: io::Error) -> Self {
        WellnessCliError::Io(e)
    }
}

impl From<screen_wellness::WellnessError> for WellnessCliError {
    fn from(e: screen_wellness::WellnessError) -> Self {
        WellnessCliError::Analysis(e)
    }
}

impl From<serde_json::Error> for WellnessCliError {
    fn from(e: serde_json::Error) -> Self {
        WellnessCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<WellnessCliError> for CliError {
    fn from(e: WellnessCliError) -> Self {
        match e {
            WellnessCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            WellnessCliError::Analysis(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'wellness schema input' for the expected shape".to_string()),
            },
            WellnessCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            WellnessCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            WellnessCliError::Server(msg) => CliError {
                code: "SERVER_ERROR".to_string(),
                message: msg,
                hint: Some("Check the bind address and static directory".to_string()),
            },
            WellnessCliError::ServerDisabled => CliError {
                code: "SERVER_DISABLED".to_string(),
                message: "This build does not include the HTTP server".to_string(),
                hint: Some("Rebuild with --features cli,server".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Debug, PartialEq, serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
