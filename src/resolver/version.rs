//! Module version extraction.
//!
//! Downloaded modules live in the module cache under directories named
//! `<module>@<version>`, so the version of a declaration outside the
//! workspace can usually be read straight off its file path.

use std::path::{is_separator, Path};

use semver::Version;

use crate::resolver::errors::ResolveError;

/// Check whether `v` is a valid Go-style semantic version.
///
/// The leading `v` is required. Besides full `vMAJOR.MINOR.PATCH[-pre][+build]`
/// versions the shorthands `vMAJOR` and `vMAJOR.MINOR` are accepted.
pub fn is_valid(v: &str) -> bool {
    let Some(rest) = v.strip_prefix('v') else {
        return false;
    };

    if Version::parse(rest).is_ok() {
        return true;
    }

    let parts: Vec<&str> = rest.split('.').collect();
    match parts.len() {
        1 | 2 => parts.iter().all(|p| is_numeric_ident(p)),
        _ => false,
    }
}

fn is_numeric_ident(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && (s == "0" || !s.starts_with('0'))
}

/// Read the version off a module-cache path.
///
/// Every path segment that directly follows an `@` is a candidate. The
/// version is only trusted if exactly one candidate is a valid version.
pub fn version_fast(mod_cache: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(mod_cache).unwrap_or(file);
    let rel = rel.to_string_lossy();

    let candidates: Vec<&str> = rel
        .split('@')
        .skip(1)
        .filter_map(|piece| piece.split(is_separator).next())
        .filter(|segment| is_valid(segment))
        .collect();

    match candidates.as_slice() {
        [version] => Some(version.to_string()),
        _ => None,
    }
}

/// Look the version up through the toolchain.
///
/// There is no cheap way to do this without listing the module graph a
/// second time, so it always fails.
pub fn version_slow(file: &Path) -> Result<String, ResolveError> {
    Err(ResolveError::UnsupportedVersionLookup {
        path: file.display().to_string(),
    })
}

/// Reduce a raw module version to what goes into a package locator.
///
/// Pseudo-versions (`base-timestamp-hash`, possibly with `+incompatible`)
/// become the short commit hash; anything else is kept as is.
pub fn normalize(raw: &str) -> String {
    if raw.matches('-').count() != 2 {
        return raw.to_string();
    }

    let trimmed = raw.strip_suffix("+incompatible").unwrap_or(raw);
    trimmed.rsplit('-').next().unwrap_or(trimmed).to_string()
}

/// Resolve the version of the module containing `file`.
///
/// Returns `None` when the version cannot be determined; a missing version
/// is not an error.
pub fn resolve_version(mod_cache: &Path, file: &Path) -> Option<String> {
    let raw = match version_fast(mod_cache, file) {
        Some(raw) => raw,
        None => match version_slow(file) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("giving up on version: {}", e);
                return None;
            }
        },
    };

    Some(normalize(&raw))
}
