// External actions and the runners that execute them

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::fmt;
use tokio::process::Command;
use tracing::{debug, info};

/// Suffix dropped from registry endpoints before handing them to `az acr login`
const ACR_SUFFIX: &str = ".azurecr.io";

/// CLI used for registry authentication
const LOGIN_CLI: &str = "az";

/// A single side-effecting action against a registry or the local image store
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Login { registry: String },
    Pull { reference: String },
    Tag { source: String, target: String },
    Push { reference: String },
}

impl Action {
    fn icon(&self) -> &'static str {
        match self {
            Action::Login { .. } => "🔍",
            Action::Pull { .. } => "📥",
            Action::Tag { .. } => "🏷️ ",
            Action::Push { .. } => "📤",
        }
    }

    fn progress_message(&self) -> String {
        match self {
            Action::Login { registry } => format!("Authenticating to {}", registry),
            Action::Pull { reference } => format!("Pulling {}", reference),
            Action::Tag { source, target } => format!("Tagging {} as {}", source, target),
            Action::Push { reference } => format!("Pushing {}", reference),
        }
    }

    fn done_message(&self) -> String {
        match self {
            Action::Login { registry } => format!("Authenticated to {}", registry),
            Action::Pull { reference } => format!("Pulled {}", reference),
            Action::Tag { target, .. } => format!("Tagged {}", target),
            Action::Push { reference } => format!("Pushed {}", reference),
        }
    }
}

/// Phrased so it reads after "Would ..."
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Login { registry } => write!(f, "authenticate to {}", registry),
            Action::Pull { reference } => write!(f, "pull {}", reference),
            Action::Tag { source, target } => write!(f, "tag {} as {}", source, target),
            Action::Push { reference } => write!(f, "push {}", reference),
        }
    }
}

/// Executes actions. Success or failure is the only observable outcome.
#[async_trait]
pub(crate) trait ActionRunner: Send + Sync {
    async fn execute(&self, action: &Action) -> Result<()>;
}

/// Registry name as expected by `az acr login --name`
pub(crate) fn acr_name(registry: &str) -> &str {
    registry.strip_suffix(ACR_SUFFIX).unwrap_or(registry)
}

/// Runs actions by spawning the login CLI and the container CLI
pub(crate) struct ShellRunner {
    container_cli: String,
}

impl ShellRunner {
    pub(crate) fn new(container_cli: impl Into<String>) -> Self {
        Self {
            container_cli: container_cli.into(),
        }
    }

    /// Program and arguments for an action
    fn command_line(&self, action: &Action) -> (&str, Vec<String>) {
        match action {
            Action::Login { registry } => (
                LOGIN_CLI,
                vec![
                    "acr".to_string(),
                    "login".to_string(),
                    "--name".to_string(),
                    acr_name(registry).to_string(),
                ],
            ),
            Action::Pull { reference } => (
                self.container_cli.as_str(),
                vec!["pull".to_string(), reference.clone()],
            ),
            Action::Tag { source, target } => (
                self.container_cli.as_str(),
                vec!["tag".to_string(), source.clone(), target.clone()],
            ),
            Action::Push { reference } => (
                self.container_cli.as_str(),
                vec!["push".to_string(), reference.clone()],
            ),
        }
    }
}

#[async_trait]
impl ActionRunner for ShellRunner {
    async fn execute(&self, action: &Action) -> Result<()> {
        let (program, args) = self.command_line(action);
        info!("{} {}...", action.icon(), action.progress_message());

        let mut cmd = Command::new(program);
        cmd.args(&args);

        debug!("Executing command: {:?}", cmd);

        let status = cmd
            .status()
            .await
            .with_context(|| format!("Failed to execute {} (is it installed?)", program))?;

        if !status.success() {
            bail!("{} ({}) failed with status: {}", program, action, status);
        }

        info!("✓ {}", action.done_message());
        Ok(())
    }
}

/// Wraps a runner and, when enabled, replaces every action with a preview
pub(crate) struct DryRun<'a> {
    inner: &'a dyn ActionRunner,
    enabled: bool,
}

impl<'a> DryRun<'a> {
    pub(crate) fn new(inner: &'a dyn ActionRunner, enabled: bool) -> Self {
        Self { inner, enabled }
    }
}

#[async_trait]
impl ActionRunner for DryRun<'_> {
    async fn execute(&self, action: &Action) -> Result<()> {
        if self.enabled {
            info!("{} [DRY RUN] Would {}", action.icon(), action);
            return Ok(());
        }
        self.inner.execute(action).await
    }
}
