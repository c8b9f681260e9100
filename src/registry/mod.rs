// Registry module - authentication and image transfer
//
// Every external side effect goes through an `ActionRunner`, which lets the
// copy orchestrator swap in a dry-run preview or a recording runner in tests.

pub(crate) mod reference;
mod runner;
#[cfg(test)]
pub(crate) mod testing;
mod transfer;

pub(crate) use runner::{Action, ActionRunner, DryRun, ShellRunner};
pub(crate) use transfer::{pull, push, tag};

use tracing::info;

use crate::error::CopyError;

/// Log in to `registry` unless authentication is handled elsewhere
pub(crate) async fn authenticate(
    runner: &dyn ActionRunner,
    registry: &str,
    skip_auth: bool,
) -> Result<(), CopyError> {
    if skip_auth {
        info!(
            "🔍 Skipping authentication to {} (assumed to be handled externally)",
            registry
        );
        return Ok(());
    }

    runner
        .execute(&Action::Login {
            registry: registry.to_string(),
        })
        .await
        .map_err(|e| CopyError::authentication(registry, e))
}
