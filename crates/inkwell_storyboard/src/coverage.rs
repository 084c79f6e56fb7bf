//! Manifest coverage checks.
//!
//! A collection covers the manifest when its (page, panel) set equals the
//! manifest's exactly and no unit appears twice.

use crate::{PanelEntry, StoryboardDocument};
use inkwell_core::ManifestEntry;
use inkwell_error::{CoverageError, CoverageErrorKind, UnitRef};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

fn units(entries: impl IntoIterator<Item = ManifestEntry>) -> Vec<UnitRef> {
    entries.into_iter().map(UnitRef::from).collect()
}

fn collapsed(
    collection: &str,
    dimension: &'static str,
    manifest: impl Iterator<Item = u32>,
    output: impl Iterator<Item = u32>,
) -> Option<CoverageError> {
    let expected = manifest.collect::<BTreeSet<_>>().len();
    let actual = output.collect::<BTreeSet<_>>().len();
    (expected > 1 && actual == 1).then(|| {
        CoverageError::new(CoverageErrorKind::Collapsed {
            collection: collection.to_string(),
            dimension,
            expected,
        })
    })
}

/// Collect units into a set, failing on the first collection that repeats one.
fn distinct_units(
    collection: &str,
    entries: impl IntoIterator<Item = ManifestEntry>,
) -> Result<BTreeSet<ManifestEntry>, CoverageError> {
    let mut seen = BTreeSet::new();
    let mut repeated = BTreeSet::new();
    for unit in entries {
        if !seen.insert(unit) {
            repeated.insert(unit);
        }
    }
    if repeated.is_empty() {
        Ok(seen)
    } else {
        Err(CoverageError::new(CoverageErrorKind::Duplicate {
            collection: collection.to_string(),
            units: units(repeated),
        }))
    }
}

/// Check that a manifest is usable: non-empty with every (page, panel) unique.
///
/// A repeated pair would let one output entry stand in for two script panels.
#[track_caller]
pub fn check_manifest(manifest: &[ManifestEntry]) -> Result<(), CoverageError> {
    if manifest.is_empty() {
        return Err(CoverageError::new(CoverageErrorKind::EmptyManifest));
    }
    distinct_units("manifest", manifest.iter().copied()).map(|_| ())
}

/// Check one collection against the manifest.
///
/// Failures are reported in this order: empty manifest, repeated units, a
/// collapse of many pages or panels into one, units missing from the
/// collection, units not in the manifest.
///
/// # Examples
///
/// ```
/// use inkwell_core::ManifestEntry;
/// use inkwell_error::CoverageErrorKind;
/// use inkwell_storyboard::check_collection;
///
/// let manifest = [ManifestEntry::new(1, 1), ManifestEntry::new(1, 2)];
/// assert!(check_collection(&manifest, "coverage", &manifest).is_ok());
///
/// let err = check_collection(&manifest, "coverage", &manifest[..1]).unwrap_err();
/// assert!(matches!(err.kind, CoverageErrorKind::Collapsed { dimension: "panel", .. }));
/// ```
#[track_caller]
pub fn check_collection<E: PanelEntry>(
    manifest: &[ManifestEntry],
    collection: &str,
    entries: &[E],
) -> Result<(), CoverageError> {
    if manifest.is_empty() {
        return Err(CoverageError::new(CoverageErrorKind::EmptyManifest));
    }

    let seen = distinct_units(collection, entries.iter().map(|entry| entry.unit()))?;

    if let Some(err) = collapsed(
        collection,
        "page",
        manifest.iter().map(|m| m.page),
        seen.iter().map(|u| u.page),
    ) {
        return Err(err);
    }
    if let Some(err) = collapsed(
        collection,
        "panel",
        manifest.iter().map(|m| m.panel),
        seen.iter().map(|u| u.panel),
    ) {
        return Err(err);
    }

    let required = manifest.iter().copied().collect::<BTreeSet<_>>();
    let missing = required.difference(&seen).copied().collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(CoverageError::new(CoverageErrorKind::Missing {
            collection: collection.to_string(),
            units: units(missing),
        }));
    }

    let unexpected = seen.difference(&required).copied().collect::<Vec<_>>();
    if !unexpected.is_empty() {
        return Err(CoverageError::new(CoverageErrorKind::Unexpected {
            collection: collection.to_string(),
            units: units(unexpected),
        }));
    }

    Ok(())
}

/// Check every required collection of `document` against its manifest.
#[instrument(skip_all, fields(units = document.manifest.len()))]
pub fn check_coverage(document: &StoryboardDocument) -> Result<(), CoverageError> {
    let manifest = &document.manifest;
    check_manifest(manifest)?;
    check_collection(manifest, "coverage", &document.coverage)?;
    check_collection(manifest, "ink", &document.ink)?;
    check_collection(manifest, "proof", &document.proof)?;
    debug!("Coverage complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(pages: u32, panels: u32) -> Vec<ManifestEntry> {
        (1..=pages)
            .flat_map(|page| (1..=panels).map(move |panel| ManifestEntry::new(page, panel)))
            .collect()
    }

    #[test]
    fn test_exact_cover_passes() {
        let manifest = grid(2, 3);
        let mut shuffled = manifest.clone();
        shuffled.reverse();
        assert!(check_collection(&manifest, "ink", &shuffled).is_ok());
    }

    #[test]
    fn test_empty_manifest_fails() {
        let err = check_collection::<ManifestEntry>(&[], "ink", &[]).unwrap_err();
        assert_eq!(err.kind, CoverageErrorKind::EmptyManifest);
    }

    #[test]
    fn test_repeated_unit_fails() {
        let manifest = grid(1, 2);
        let entries = [manifest[0], manifest[1], manifest[1]];
        let err = check_collection(&manifest, "proof", &entries).unwrap_err();
        assert_eq!(
            err.kind,
            CoverageErrorKind::Duplicate {
                collection: "proof".to_string(),
                units: vec![UnitRef { page: 1, panel: 2 }],
            }
        );
    }

    #[test]
    fn test_pages_collapsed_to_one() {
        let manifest = grid(3, 2);
        let err = check_collection(&manifest, "ink", &grid(1, 2)).unwrap_err();
        assert_eq!(
            err.kind,
            CoverageErrorKind::Collapsed {
                collection: "ink".to_string(),
                dimension: "page",
                expected: 3,
            }
        );
    }

    #[test]
    fn test_unexpected_unit_fails() {
        let manifest = grid(1, 2);
        let mut entries = manifest.clone();
        entries.push(ManifestEntry::new(1, 3));
        let err = check_collection(&manifest, "coverage", &entries).unwrap_err();
        assert_eq!(
            err.kind,
            CoverageErrorKind::Unexpected {
                collection: "coverage".to_string(),
                units: vec![UnitRef { page: 1, panel: 3 }],
            }
        );
    }

    #[test]
    fn test_empty_collection_reports_every_unit_missing() {
        let manifest = grid(1, 2);
        let err = check_collection::<ManifestEntry>(&manifest, "ink", &[]).unwrap_err();
        assert!(matches!(
            err.kind,
            CoverageErrorKind::Missing { ref units, .. } if units.len() == 2
        ));
    }
}
