//! kyc: run the identity verification pipeline against a verification oracle.

mod capture;
mod config;

use clap::Parser;
use config::CliConfig;
use kyc_oracle::HttpOracle;
use kyc_types::{ExpectedIdentity, MismatchInfo, Verdict};
use kyc_utils::{format_bytes, init_logging, LogFormat};
use kyc_verification::{
    CaptureError, PolicyOutcome, QualityGate, ValidationError, VerificationFlow,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit code when a capture fails the local quality gate.
const EXIT_REJECTED_CAPTURE: u8 = 2;
/// Exit code when the pipeline stops short of a terminal outcome.
const EXIT_NOT_VERIFIED: u8 = 3;

#[derive(Parser)]
#[command(name = "kyc", about = "Identity verification pipeline client")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the verification oracle.
    #[arg(long, global = true, env = "KYC_ORACLE_URL")]
    oracle_url: Option<String>,

    /// Bearer token sent with every oracle request.
    #[arg(long, global = true, env = "KYC_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Smallest accepted capture, in bytes.
    #[arg(long, global = true, env = "KYC_MIN_IMAGE_BYTES")]
    min_image_bytes: Option<usize>,

    /// Largest accepted capture, in bytes.
    #[arg(long, global = true, env = "KYC_MAX_IMAGE_BYTES")]
    max_image_bytes: Option<usize>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "KYC_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "KYC_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run an image through the local quality gate without uploading it.
    #[command(name = "check-image")]
    CheckImage {
        /// Image file to check.
        path: PathBuf,
    },
    /// Verify a document and selfie against the expected identity.
    Verify {
        /// Photo of the identity document.
        #[arg(long)]
        document: PathBuf,

        /// Selfie holding the document.
        #[arg(long)]
        selfie: PathBuf,

        #[arg(long)]
        full_name: String,

        /// Date of birth as printed on the document (YYYY-MM-DD).
        #[arg(long)]
        date_of_birth: String,

        #[arg(long)]
        id_number: String,

        #[arg(long)]
        gender: String,
    },
}

impl Cli {
    /// File settings (or defaults) with flags and env vars applied on top.
    fn resolve_config(&self) -> anyhow::Result<CliConfig> {
        let mut config = match &self.config {
            Some(path) => CliConfig::from_toml_file(path)?,
            None => CliConfig::default(),
        };

        if let Some(url) = &self.oracle_url {
            config.oracle.base_url = url.clone();
        }
        if let Some(token) = &self.auth_token {
            config.oracle.auth_token = Some(token.clone());
        }
        if let Some(min) = self.min_image_bytes {
            config.gate.min_bytes = min;
        }
        if let Some(max) = self.max_image_bytes {
            config.gate.max_bytes = max;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }

        if !config.gate.is_valid() {
            anyhow::bail!(
                "invalid image bounds: min {} exceeds max {}",
                config.gate.min_bytes,
                config.gate.max_bytes
            );
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let format: LogFormat = config.log_format.parse()?;
    init_logging(format, &config.log_level);

    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    let gate = QualityGate::new(&config.gate);

    match cli.command {
        Command::CheckImage { path } => check_image(&gate, &path),
        Command::Verify {
            document,
            selfie,
            full_name,
            date_of_birth,
            id_number,
            gender,
        } => {
            let expected = ExpectedIdentity::new(full_name, date_of_birth, id_number, gender);
            let oracle = HttpOracle::from_config(&config.oracle)?;
            tracing::info!(oracle = %config.oracle.base_url, "starting verification");
            verify(VerificationFlow::new(oracle, gate), &document, &selfie, &expected).await
        }
    }
}

fn check_image(gate: &QualityGate, path: &Path) -> anyhow::Result<ExitCode> {
    let image = capture::read_image(path)?;
    let len = image.len();
    match gate.admit(image) {
        Ok(_) => {
            println!(
                "ok: {} within [{}, {}]",
                format_bytes(len),
                format_bytes(gate.min_bytes()),
                format_bytes(gate.max_bytes())
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_rejected_capture(&e)),
    }
}

async fn verify(
    flow: VerificationFlow<HttpOracle>,
    document: &Path,
    selfie: &Path,
    expected: &ExpectedIdentity,
) -> anyhow::Result<ExitCode> {
    if let Err(e) = flow.capture_document(capture::read_image(document)?) {
        return capture_failure(e);
    }

    match flow.submit_document(expected).await? {
        PolicyOutcome::DocumentAccepted { verdict } => {
            let name = flow
                .session()
                .document_result()
                .and_then(|doc| doc.ocr.fields.display_name());
            println!("{}", accepted_message(verdict, name.as_deref()));
        }
        PolicyOutcome::MismatchBlocked(info) => {
            println!("{}", mismatch_message(info));
            println!("Check the details you entered, or retake the document photo.");
            return Ok(ExitCode::from(EXIT_NOT_VERIFIED));
        }
        PolicyOutcome::DocumentRetryRequired => {
            println!("document rejected: retake the photo with all four corners visible");
            return Ok(ExitCode::from(EXIT_NOT_VERIFIED));
        }
        other => anyhow::bail!("unexpected document outcome: {other:?}"),
    }

    if let Err(e) = flow.capture_selfie(capture::read_image(selfie)?) {
        return capture_failure(e);
    }

    match flow.submit_face(expected).await? {
        PolicyOutcome::Completed(_) => {}
        PolicyOutcome::FaceRetryRequired => {
            println!("face match failed: retake the selfie holding your document");
            return Ok(ExitCode::from(EXIT_NOT_VERIFIED));
        }
        other => anyhow::bail!("unexpected face outcome: {other:?}"),
    }

    match flow.finish() {
        Some(outcome) => {
            println!("{outcome}");
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::from(EXIT_NOT_VERIFIED)),
    }
}

fn accepted_message(verdict: Verdict, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("document accepted ({verdict}): {name}"),
        None => format!("document accepted ({verdict})"),
    }
}

fn mismatch_message(info: MismatchInfo) -> String {
    format!("document does not match: {}", info.into_fields().join(", "))
}

fn capture_failure(err: CaptureError) -> anyhow::Result<ExitCode> {
    match err {
        CaptureError::Validation(e) => Ok(report_rejected_capture(&e)),
        CaptureError::Session(e) => Err(e.into()),
    }
}

fn report_rejected_capture(err: &ValidationError) -> ExitCode {
    tracing::warn!(error = %err, "capture rejected");
    println!("rejected: {err}");
    println!("{}", err.guidance());
    ExitCode::from(EXIT_REJECTED_CAPTURE)
}
