//! Coverage error types.

use std::fmt;

/// A (page, panel) unit named in a coverage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("page {} panel {}", page, panel)]
pub struct UnitRef {
    /// Page number
    pub page: u32,
    /// Panel number within the page
    pub panel: u32,
}

/// Specific coverage failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CoverageErrorKind {
    /// The manifest has no units to cover
    EmptyManifest,
    /// Manifest units absent from a collection
    Missing {
        /// Collection name (e.g., "ink")
        collection: String,
        /// Units present in the manifest but not the collection
        units: Vec<UnitRef>,
    },
    /// Collection units absent from the manifest
    Unexpected {
        /// Collection name
        collection: String,
        /// Units present in the collection but not the manifest
        units: Vec<UnitRef>,
    },
    /// More than one entry for the same unit
    Duplicate {
        /// Collection name
        collection: String,
        /// Units listed more than once
        units: Vec<UnitRef>,
    },
    /// Many distinct manifest pages/panels collapsed to a single one
    Collapsed {
        /// Collection name
        collection: String,
        /// Which dimension collapsed ("page" or "panel")
        dimension: &'static str,
        /// Distinct values in the manifest
        expected: usize,
    },
}

fn write_units(f: &mut fmt::Formatter<'_>, units: &[UnitRef]) -> fmt::Result {
    for (i, unit) in units.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", unit)?;
    }
    Ok(())
}

impl fmt::Display for CoverageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyManifest => write!(f, "manifest is empty"),
            Self::Missing { collection, units } => {
                write!(
                    f,
                    "collection '{}' is missing {} manifest unit(s): ",
                    collection,
                    units.len()
                )?;
                write_units(f, units)
            }
            Self::Unexpected { collection, units } => {
                write!(
                    f,
                    "collection '{}' has {} unit(s) not in the manifest: ",
                    collection,
                    units.len()
                )?;
                write_units(f, units)
            }
            Self::Duplicate { collection, units } => {
                write!(f, "collection '{}' repeats unit(s): ", collection)?;
                write_units(f, units)
            }
            Self::Collapsed {
                collection,
                dimension,
                expected,
            } => write!(
                f,
                "collection '{}' collapsed {} distinct {}s into one",
                collection, expected, dimension
            ),
        }
    }
}

/// Manifest/output set mismatch or suspicious collapse. Always a hard failure.
///
/// # Examples
///
/// ```
/// use inkwell_error::{CoverageError, CoverageErrorKind, UnitRef};
///
/// let err = CoverageError::new(CoverageErrorKind::Missing {
///     collection: "ink".to_string(),
///     units: vec![UnitRef { page: 2, panel: 3 }],
/// });
/// assert!(format!("{}", err).contains("page 2 panel 3"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Coverage Error: {} at line {} in {}", kind, line, file)]
pub struct CoverageError {
    /// The specific error condition
    pub kind: CoverageErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl CoverageError {
    /// Create a new CoverageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CoverageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
