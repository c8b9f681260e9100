// Image reference derivation
//
// Every place that needs a source or target reference goes through these
// functions so the orchestrator and the individual operations always agree.

/// Split an image name into its base and an optional embedded tag.
///
/// A `@digest` suffix is dropped before looking for the tag, and only a colon
/// in the last path segment counts as a tag separator, so neither
/// `app@sha256:...` nor a registry port such as `localhost:5000/app` is
/// mistaken for a tag.
pub(crate) fn split_tag(image_name: &str) -> (&str, Option<&str>) {
    let (name, _) = split_digest(image_name);
    let segment_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    match name[segment_start..].find(':') {
        Some(pos) => {
            let split = segment_start + pos;
            (&name[..split], Some(&name[split + 1..]))
        }
        None => (name, None),
    }
}

/// Split off a `@digest` suffix
fn split_digest(image_name: &str) -> (&str, Option<&str>) {
    match image_name.split_once('@') {
        Some((name, digest)) => (name, Some(digest)),
        None => (image_name, None),
    }
}

/// Image name with any embedded `:tag` or `@digest` suffix removed
pub(crate) fn image_base(image_name: &str) -> &str {
    split_tag(image_name).0
}

/// Reference pulled from the source registry.
///
/// A digest or explicit tag in the image name selects what gets pulled;
/// otherwise the version is used.
pub(crate) fn source_reference(registry: &str, image_name: &str, version: &str) -> String {
    if let (_, Some(digest)) = split_digest(image_name) {
        if !digest.is_empty() {
            return format!("{}/{}", registry, image_name);
        }
    }
    match split_tag(image_name) {
        (base, Some(tag)) if !tag.is_empty() => format!("{}/{}:{}", registry, base, tag),
        (base, _) => format!("{}/{}:{}", registry, base, version),
    }
}

/// Reference the image is tagged as and pushed to in the target registry
pub(crate) fn target_reference(registry: &str, image_name: &str, version: &str) -> String {
    format!("{}/{}:{}", registry, image_base(image_name), version)
}
