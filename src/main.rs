use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::collections::HashMap;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod copy;
mod error;
mod registry;

use config::CopyConfig;
use copy::{copy_image, CopyReport};
use error::CopyError;
use registry::{ActionRunner, ShellRunner};

/// Copy a container image from one registry to another.
///
/// Every option can also be supplied through the environment variable named
/// in its description; flags take precedence.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Image name, optionally with an embedded tag [env: IMAGE_NAME]
    #[arg(long)]
    image_name: Option<String>,
    /// Version the target image is tagged with [env: VERSION]
    #[arg(long)]
    image_version: Option<String>,
    /// Source registry endpoint [env: SOURCE_REGISTRY or SOURCE_ACR]
    #[arg(long)]
    source_registry: Option<String>,
    /// Target registry endpoint [env: TARGET_REGISTRY or TARGET_ACR]
    #[arg(long)]
    target_registry: Option<String>,
    /// Workflow to run: pull, push, tag or full [env: MODE]
    #[arg(long)]
    mode: Option<String>,
    /// Preview actions without executing them [env: DRY_RUN=true]
    #[arg(long)]
    dry_run: bool,
    /// Assume registry authentication is handled externally [env: SKIP_AUTH=true]
    #[arg(long)]
    skip_auth: bool,
    /// Container CLI to use (docker or podman) [env: CONTAINER_CLI]
    #[arg(long)]
    container_cli: Option<String>,
    /// Format of the completion summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Overlay flags onto the environment inputs
    fn apply_to(&self, inputs: &mut HashMap<String, String>) {
        let overrides = [
            (config::IMAGE_NAME, &self.image_name),
            (config::VERSION, &self.image_version),
            (config::SOURCE_REGISTRY, &self.source_registry),
            (config::TARGET_REGISTRY, &self.target_registry),
            (config::MODE, &self.mode),
            (config::CONTAINER_CLI, &self.container_cli),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                inputs.insert(key.to_string(), value.clone());
            }
        }
        if self.dry_run {
            inputs.insert(config::DRY_RUN.to_string(), "true".to_string());
        }
        if self.skip_auth {
            inputs.insert(config::SKIP_AUTH.to_string(), "true".to_string());
        }
    }
}

async fn run(cli: &Cli) -> Result<CopyReport, CopyError> {
    let mut inputs: HashMap<String, String> = std::env::vars().collect();
    cli.apply_to(&mut inputs);

    run_with(&inputs, |config| ShellRunner::new(config.container_cli.as_str())).await
}

/// Validate `inputs` and copy with the runner built for the resulting config.
///
/// The runner is only created once the configuration is valid.
async fn run_with<R, F>(
    inputs: &HashMap<String, String>,
    runner_for: F,
) -> Result<CopyReport, CopyError>
where
    R: ActionRunner,
    F: FnOnce(&CopyConfig) -> R,
{
    let config = CopyConfig::from_inputs(inputs)?;
    let runner = runner_for(&config);
    copy_image(&config, &runner).await
}

fn print_report(report: &CopyReport, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => println!("✅ {}", report.summary()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(report).context("Failed to serialize copy report")?
        ),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so that stdout only carries the summary
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let outcome = match run(&cli).await {
        Ok(report) => print_report(&report, cli.output).map_err(CopyError::from),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report();
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::testing::RecordingRunner;

    #[test]
    fn test_flags_override_environment_inputs() {
        let cli = Cli::try_parse_from([
            "registry-copy",
            "--image-name",
            "web:old",
            "--image-version",
            "3.0",
            "--mode",
            "tag",
            "--dry-run",
        ])
        .unwrap();

        let mut inputs = HashMap::from([
            (config::IMAGE_NAME.to_string(), "api".to_string()),
            (config::SOURCE_ACR.to_string(), "src.azurecr.io".to_string()),
            (config::TARGET_ACR.to_string(), "dst.azurecr.io".to_string()),
        ]);
        cli.apply_to(&mut inputs);

        let config = CopyConfig::from_inputs(&inputs).unwrap();
        assert_eq!(config.image_name, "web:old");
        assert_eq!(config.version, "3.0");
        assert_eq!(config.mode, copy::Mode::Tag);
        assert!(config.dry_run);
        assert!(!config.skip_auth);
        assert_eq!(config.target_reference(), "dst.azurecr.io/web:3.0");
    }

    #[test]
    fn test_absent_flags_leave_inputs_untouched() {
        let cli = Cli::try_parse_from(["registry-copy"]).unwrap();
        let mut inputs = HashMap::from([(config::DRY_RUN.to_string(), "false".to_string())]);
        cli.apply_to(&mut inputs);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[config::DRY_RUN], "false");
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_output_format_flag() {
        let cli = Cli::try_parse_from(["registry-copy", "--output", "json"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
    }

    fn complete_inputs() -> HashMap<String, String> {
        HashMap::from([
            (config::IMAGE_NAME.to_string(), "app".to_string()),
            (config::VERSION.to_string(), "1.0".to_string()),
            (config::SOURCE_REGISTRY.to_string(), "src.example.com".to_string()),
            (config::TARGET_REGISTRY.to_string(), "dst.example.com".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_dry_run_end_to_end() {
        let cli = Cli::try_parse_from(["registry-copy", "--dry-run", "--container-cli", "podman"])
            .unwrap();
        let mut inputs = complete_inputs();
        cli.apply_to(&mut inputs);

        let recorder = RecordingRunner::new();
        let mut container_cli = None;
        let report = run_with(&inputs, |config| {
            container_cli = Some(config.container_cli.clone());
            recorder.clone()
        })
        .await
        .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.source, "src.example.com/app:1.0");
        assert_eq!(report.target, "dst.example.com/app:1.0");
        assert_eq!(container_cli.as_deref(), Some("podman"));
        assert!(recorder.actions().is_empty());
    }

    #[tokio::test]
    async fn test_full_copy_runs_every_action() {
        let recorder = RecordingRunner::new();
        let report = run_with(&complete_inputs(), |_| recorder.clone())
            .await
            .unwrap();

        assert!(!report.dry_run);
        assert_eq!(recorder.actions().len(), 5);
    }

    #[tokio::test]
    async fn test_missing_field_executes_nothing() {
        let mut inputs = complete_inputs();
        inputs.remove(config::VERSION);

        let recorder = RecordingRunner::new();
        let err = run_with(&inputs, |_| recorder.clone()).await.unwrap_err();

        match &err {
            CopyError::Configuration(config_err) => {
                assert_eq!(config_err.violations.len(), 1);
                assert_eq!(config_err.violations[0].field, config::VERSION);
            }
            other => panic!("expected a configuration error, got {:?}", other),
        }
        assert!(recorder.actions().is_empty());
    }
}
