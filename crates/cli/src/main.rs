// kinfill CLI - headless invoice-PDF fill flow
// Analyze an invoice PDF and write the extracted data into a kintone record.

mod exit_codes;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use kinfill_client::{
    submit, AnalyzerClient, KintoneClient, RecordSink, RecordTarget, Severity, SubmitOutcome,
};
use kinfill_recon::{reconcile, validate, FieldMapping, RecordPatch, ValidateError};

use exit_codes::{
    submit_exit_code, EXIT_CONFIG, EXIT_IO, EXIT_NO_TRANSACTIONS, EXIT_SUCCESS, EXIT_VALIDATION,
};

#[derive(Parser)]
#[command(name = "kinfill")]
#[command(about = "Fill a kintone record from an analyzed invoice PDF")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a PDF and write the extracted data into a record
    #[command(after_help = "\
Examples:
  kinfill fill invoice.pdf --endpoint https://analyzer.example.com/analyze-pdf \\
      --base-url https://acme.cybozu.com --api-token $KINTONE_API_TOKEN \\
      --app 12 --record 99
  kinfill fill invoice.pdf --endpoint https://analyzer.example.com/analyze-pdf --dry-run
  kinfill fill invoice.pdf --mapping fields.toml --dry-run")]
    Fill {
        /// Invoice PDF to submit for analysis
        pdf: PathBuf,

        /// Analyzer endpoint URL
        #[arg(long, env = "KINFILL_ANALYZER_URL")]
        endpoint: String,

        /// kintone subdomain root, e.g. https://acme.cybozu.com
        #[arg(long, env = "KINTONE_BASE_URL", required_unless_present = "dry_run")]
        base_url: Option<String>,

        /// kintone app API token
        #[arg(long, env = "KINTONE_API_TOKEN", hide_env_values = true,
              required_unless_present = "dry_run")]
        api_token: Option<String>,

        /// App ID containing the record
        #[arg(long, required_unless_present = "dry_run")]
        app: Option<u64>,

        /// Record ID to update
        #[arg(long, required_unless_present = "dry_run")]
        record: Option<u64>,

        /// Field mapping TOML (built-in defaults when omitted)
        #[arg(long)]
        mapping: Option<PathBuf>,

        /// Print the record patch to stdout instead of writing back
        #[arg(long)]
        dry_run: bool,

        /// Suppress info-severity status messages
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Map a saved analyzer response (JSON file) to a record patch
    #[command(after_help = "\
Examples:
  kinfill map response.json
  kinfill map response.json --mapping fields.toml | jq .")]
    Map {
        /// Analyzer response JSON file
        response: PathBuf,

        /// Field mapping TOML (built-in defaults when omitted)
        #[arg(long)]
        mapping: Option<PathBuf>,
    },
}

/// Error carrying its exit code to the top of main.
struct CliError {
    code: u8,
    message: String,
}

impl CliError {
    fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into() }
    }

    fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into() }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fill {
            pdf,
            endpoint,
            base_url,
            api_token,
            app,
            record,
            mapping,
            dry_run,
            quiet,
        } => cmd_fill(FillArgs {
            pdf,
            endpoint,
            base_url,
            api_token,
            app,
            record,
            mapping,
            dry_run,
            quiet,
        }),
        Commands::Map { response, mapping } => cmd_map(&response, mapping),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {}", err.message);
            ExitCode::from(err.code)
        }
    }
}

// ── fill ────────────────────────────────────────────────────────────

struct FillArgs {
    pdf: PathBuf,
    endpoint: String,
    base_url: Option<String>,
    api_token: Option<String>,
    app: Option<u64>,
    record: Option<u64>,
    mapping: Option<PathBuf>,
    dry_run: bool,
    quiet: bool,
}

/// Sink for --dry-run: print the patch instead of writing it anywhere.
struct StdoutSink;

impl RecordSink for StdoutSink {
    fn write(&mut self, patch: &RecordPatch) -> Result<(), String> {
        let json = serde_json::to_string_pretty(patch).map_err(|e| e.to_string())?;
        println!("{}", json);
        Ok(())
    }
}

fn cmd_fill(args: FillArgs) -> Result<u8, CliError> {
    let mapping = load_mapping(args.mapping)?;

    let pdf_bytes = fs::read(&args.pdf)
        .map_err(|e| CliError::io(format!("cannot read {}: {}", args.pdf.display(), e)))?;
    let file_name = args
        .pdf
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.pdf")
        .to_string();

    let analyzer = AnalyzerClient::new(args.endpoint);

    let quiet = args.quiet;
    let mut notify = |msg: &str, severity: Severity| match severity {
        Severity::Info if quiet => {}
        Severity::Info => eprintln!("info: {}", msg),
        Severity::Error => eprintln!("error: {}", msg),
    };

    let outcome = if args.dry_run {
        let mut sink = StdoutSink;
        submit(&analyzer, &mapping, &mut sink, &file_name, pdf_bytes, &mut notify)
    } else {
        // clap guarantees these are present when --dry-run is absent.
        let base_url = args.base_url.unwrap_or_default();
        let api_token = args.api_token.unwrap_or_default();
        let app = args.app.unwrap_or_default();
        let record = args.record.unwrap_or_default();

        let host = KintoneClient::new(base_url, api_token);
        let mut target = RecordTarget::new(&host, app, record);
        submit(&analyzer, &mapping, &mut target, &file_name, pdf_bytes, &mut notify)
    };

    // Submission boundary: every failure ends here as an error
    // notification plus an exit code. Nothing propagates further.
    match outcome {
        Ok(SubmitOutcome::Filled { .. }) => Ok(EXIT_SUCCESS),
        Ok(SubmitOutcome::NothingToFill) => Ok(EXIT_NO_TRANSACTIONS),
        Err(err) => {
            eprintln!("error: {}", err);
            Ok(submit_exit_code(&err))
        }
    }
}

// ── map ─────────────────────────────────────────────────────────────

fn cmd_map(response: &PathBuf, mapping: Option<PathBuf>) -> Result<u8, CliError> {
    let mapping = load_mapping(mapping)?;

    let text = fs::read_to_string(response)
        .map_err(|e| CliError::io(format!("cannot read {}: {}", response.display(), e)))?;
    let raw: serde_json::Value = serde_json::from_str(&text).map_err(|e| CliError {
        code: EXIT_VALIDATION,
        message: format!("{} is not valid JSON: {}", response.display(), e),
    })?;

    match validate(&raw) {
        Ok(validated) => {
            let patch = reconcile(&validated, &mapping);
            let json = serde_json::to_string_pretty(&patch)
                .map_err(|e| CliError { code: EXIT_VALIDATION, message: e.to_string() })?;
            println!("{}", json);
            Ok(EXIT_SUCCESS)
        }
        Err(ValidateError::NoValidTransactions) => {
            eprintln!("error: no valid transactions extracted; nothing to fill");
            Ok(EXIT_NO_TRANSACTIONS)
        }
        Err(e) => Err(CliError { code: EXIT_VALIDATION, message: e.to_string() }),
    }
}

// ── shared ──────────────────────────────────────────────────────────

fn load_mapping(path: Option<PathBuf>) -> Result<FieldMapping, CliError> {
    match path {
        None => Ok(FieldMapping::default()),
        Some(p) => {
            let text = fs::read_to_string(&p)
                .map_err(|e| CliError::io(format!("cannot read {}: {}", p.display(), e)))?;
            FieldMapping::from_toml(&text).map_err(|e| CliError::config(e.to_string()))
        }
    }
}
