// Pull, tag and push operations

use tracing::debug;

use super::reference::{source_reference, target_reference};
use super::runner::{Action, ActionRunner};
use crate::copy::Step;
use crate::error::CopyError;

/// Pull the source image, returning the reference that was pulled
pub(crate) async fn pull(
    runner: &dyn ActionRunner,
    source_registry: &str,
    image_name: &str,
    version: &str,
) -> Result<String, CopyError> {
    let reference = source_reference(source_registry, image_name, version);
    runner
        .execute(&Action::Pull {
            reference: reference.clone(),
        })
        .await
        .map_err(|e| CopyError::transfer(Step::Pull, &reference, e))?;
    Ok(reference)
}

/// Tag `source` with its target registry name, returning the new reference
pub(crate) async fn tag(
    runner: &dyn ActionRunner,
    source: &str,
    target_registry: &str,
    image_name: &str,
    version: &str,
) -> Result<String, CopyError> {
    let target = target_reference(target_registry, image_name, version);
    debug!(source = source, target = %target, "Retagging image");
    runner
        .execute(&Action::Tag {
            source: source.to_string(),
            target: target.clone(),
        })
        .await
        .map_err(|e| CopyError::transfer(Step::Tag, format!("{} as {}", source, target), e))?;
    Ok(target)
}

/// Push a locally tagged image
pub(crate) async fn push(runner: &dyn ActionRunner, target: &str) -> Result<(), CopyError> {
    runner
        .execute(&Action::Push {
            reference: target.to_string(),
        })
        .await
        .map_err(|e| CopyError::transfer(Step::Push, target, e))
}
