// Copy orchestration
//
// Runs the step sequence selected by the configured mode. Steps execute
// strictly in order and the first failure aborts the rest of the run;
// nothing already done is rolled back.

mod mode;

pub(crate) use mode::{Mode, Step};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::CopyConfig;
use crate::error::CopyError;
use crate::registry::{self, ActionRunner, DryRun};

/// Outcome of a successful copy run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CopyReport {
    pub mode: Mode,
    pub dry_run: bool,
    pub source: String,
    pub target: String,
    pub steps: Vec<Step>,
}

impl CopyReport {
    /// One-line human readable summary
    pub(crate) fn summary(&self) -> String {
        let prefix = if self.dry_run { "[DRY RUN] " } else { "" };
        match self.mode {
            Mode::Full => format!("{}Copy completed: {} → {}", prefix, self.source, self.target),
            Mode::Pull => format!(
                "{}Pull completed: {} → {} (local)",
                prefix, self.source, self.target
            ),
            Mode::Tag => format!("{}Tag completed: {} → {}", prefix, self.source, self.target),
            Mode::Push => format!("{}Push completed: {}", prefix, self.target),
        }
    }
}

/// Copy an image according to `config`, executing actions through `runner`.
///
/// Dry-run is applied here for every step, so individual operations never
/// see it.
pub(crate) async fn copy_image(
    config: &CopyConfig,
    runner: &dyn ActionRunner,
) -> Result<CopyReport, CopyError> {
    let runner = DryRun::new(runner, config.dry_run);

    let mut source = config.source_reference();
    let mut target = config.target_reference();

    info!(
        mode = %config.mode,
        dry_run = config.dry_run,
        "Copying {} → {}",
        source,
        target
    );

    let mut completed = Vec::with_capacity(config.mode.steps().len());
    for &step in config.mode.steps() {
        debug!("Running step: {}", step);
        match step {
            Step::AuthenticateSource => {
                registry::authenticate(&runner, &config.source_registry, config.skip_auth).await?
            }
            Step::AuthenticateTarget => {
                registry::authenticate(&runner, &config.target_registry, config.skip_auth).await?
            }
            Step::Pull => {
                source = registry::pull(
                    &runner,
                    &config.source_registry,
                    &config.image_name,
                    &config.version,
                )
                .await?
            }
            Step::Tag => {
                target = registry::tag(
                    &runner,
                    &source,
                    &config.target_registry,
                    &config.image_name,
                    &config.version,
                )
                .await?
            }
            Step::Push => registry::push(&runner, &target).await?,
        }
        completed.push(step);
    }

    Ok(CopyReport {
        mode: config.mode,
        dry_run: config.dry_run,
        source,
        target,
        steps: completed,
    })
}
