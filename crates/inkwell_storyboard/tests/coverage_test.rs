//! Coverage of a five-panel manifest.

mod test_utils;

use inkwell_core::ManifestEntry;
use inkwell_error::{CoverageErrorKind, UnitRef};
use inkwell_storyboard::{InkEntry, check_collection, check_manifest};
use test_utils::harbor_script;

fn ink_for(units: &[ManifestEntry]) -> Vec<InkEntry> {
    units
        .iter()
        .map(|unit| InkEntry {
            page: unit.page,
            panel: unit.panel,
            beat: "Something happens.".to_string(),
            camera: None,
            characters: vec![],
            location: None,
            mood: None,
            evidence: vec![],
        })
        .collect()
}

#[test]
fn test_four_of_five_names_the_missing_pair() {
    let manifest = harbor_script().manifest();
    assert_eq!(manifest.len(), 5);

    let covered = manifest
        .iter()
        .copied()
        .filter(|unit| *unit != ManifestEntry::new(2, 1))
        .collect::<Vec<_>>();

    let err = check_collection(&manifest, "ink", &ink_for(&covered)).unwrap_err();
    assert_eq!(
        err.kind,
        CoverageErrorKind::Missing {
            collection: "ink".to_string(),
            units: vec![UnitRef { page: 2, panel: 1 }],
        }
    );
    assert!(err.to_string().contains("collection 'ink' is missing 1 manifest unit(s): page 2 panel 1"));
}

#[test]
fn test_every_pair_once_passes() {
    let manifest = harbor_script().manifest();
    assert!(check_collection(&manifest, "ink", &ink_for(&manifest)).is_ok());
}

#[test]
fn test_panels_collapsed_to_one() {
    let manifest = vec![
        ManifestEntry::new(1, 1),
        ManifestEntry::new(1, 2),
        ManifestEntry::new(1, 3),
    ];

    let err = check_collection(&manifest, "proof", &manifest[..1]).unwrap_err();
    assert_eq!(
        err.kind,
        CoverageErrorKind::Collapsed {
            collection: "proof".to_string(),
            dimension: "panel",
            expected: 3,
        }
    );
}

#[test]
fn test_single_unit_manifest_is_not_a_collapse() {
    let manifest = vec![ManifestEntry::new(7, 4)];
    assert!(check_collection(&manifest, "coverage", &manifest).is_ok());
}

#[test]
fn test_pair_from_another_script_is_unexpected() {
    let manifest = harbor_script().manifest();
    let mut units = manifest.clone();
    units.push(ManifestEntry::new(3, 1));

    let err = check_collection(&manifest, "ink", &ink_for(&units)).unwrap_err();
    assert!(matches!(
        err.kind,
        CoverageErrorKind::Unexpected { ref units, .. } if units == &[UnitRef { page: 3, panel: 1 }]
    ));
}

#[test]
fn test_manifest_with_repeated_pair_is_rejected() {
    let manifest = vec![ManifestEntry::new(1, 1), ManifestEntry::new(1, 1), ManifestEntry::new(1, 2)];
    assert!(check_manifest(&harbor_script().manifest()).is_ok());

    let err = check_manifest(&manifest).unwrap_err();
    assert_eq!(
        err.kind,
        CoverageErrorKind::Duplicate {
            collection: "manifest".to_string(),
            units: vec![UnitRef { page: 1, panel: 1 }],
        }
    );
}
