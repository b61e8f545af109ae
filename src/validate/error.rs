//! Validation error types.

use owo_colors::OwoColorize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// ValidationError
// ============================================================================

/// A single integrity or shape problem.
///
/// `Display` yields the exact human-readable message shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Duplicated group declaration: {0}")]
    DuplicateGroup(String),

    #[error("Duplicated subtab declaration: {0}")]
    DuplicateSubtab(String),

    #[error("Duplicated property declaration: {0}")]
    DuplicateProperty(String),

    #[error("Property {property} references non-existent group {group}")]
    UnknownGroup { property: String, group: String },

    #[error("Property {property} references non-existent subtab {subtab}")]
    UnknownSubtab { property: String, subtab: String },

    #[error("Configuration must be an object")]
    NotAnObject,
}

impl ValidationError {
    /// Short category label for grouped terminal output.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::DuplicateGroup(_) | Self::DuplicateSubtab(_) | Self::DuplicateProperty(_) => {
                "duplicate"
            }
            Self::UnknownGroup { .. } | Self::UnknownSubtab { .. } => "reference",
            Self::NotAnObject => "shape",
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Accumulated validation errors, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    errors: Vec<ValidationError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Human-readable messages; an empty list means "no errors".
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Convert to Result (returns Err if there are errors).
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl FromIterator<ValidationError> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\n", "validation errors:".red().bold())?;
        for (i, err) in self.errors.iter().enumerate() {
            write!(
                f,
                "{}{}{} {} {}",
                "[".dimmed(),
                err.category().cyan(),
                "]".dimmed(),
                "→".red(),
                err
            )?;
            if i + 1 < self.errors.len() {
                writeln!(f)?;
            }
        }
        if self.errors.len() > 1 {
            write!(
                f,
                "\n\n{} {} {}",
                "found".dimmed(),
                self.errors.len().to_string().red().bold(),
                "errors".dimmed()
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
