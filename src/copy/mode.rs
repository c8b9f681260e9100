// Copy modes and the fixed step sequence each one runs

use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which part of the copy workflow to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Mode {
    /// Authenticate to the source, pull and retag locally
    Pull,
    /// Authenticate to the target and push an already tagged local image
    Push,
    /// Retag a local image only
    Tag,
    /// The whole pipeline
    #[default]
    Full,
}

/// One step of a copy run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Step {
    AuthenticateSource,
    AuthenticateTarget,
    Pull,
    Tag,
    Push,
}

impl Mode {
    /// Steps in execution order
    pub(crate) fn steps(self) -> &'static [Step] {
        match self {
            Mode::Pull => &[Step::AuthenticateSource, Step::Pull, Step::Tag],
            Mode::Push => &[Step::AuthenticateTarget, Step::Push],
            Mode::Tag => &[Step::Tag],
            Mode::Full => &[
                Step::AuthenticateSource,
                Step::AuthenticateTarget,
                Step::Pull,
                Step::Tag,
                Step::Push,
            ],
        }
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pull" => Ok(Mode::Pull),
            "push" => Ok(Mode::Push),
            "tag" => Ok(Mode::Tag),
            "full" => Ok(Mode::Full),
            _ => bail!("Invalid mode '{}'. Supported: pull, push, tag, full", s),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Pull => "pull",
            Mode::Push => "push",
            Mode::Tag => "tag",
            Mode::Full => "full",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::AuthenticateSource => "authenticate to source",
            Step::AuthenticateTarget => "authenticate to target",
            Step::Pull => "pull",
            Step::Tag => "tag",
            Step::Push => "push",
        };
        write!(f, "{}", name)
    }
}
