//! External validator seam.
//!
//! Full validation runs in an external registry (tiered, async, with
//! cross-file enrichment); the core only defines the synchronous contract
//! that registry consumes, plus the structural invariant checks that make
//! the symbol table's API surface meaningful to it. Validators must not
//! call back into the collector during traversal.

use apex_symbol_table::SymbolTable;
use apex_symbol_types::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options handed to a validator run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Validators that declare unmet prerequisites fail instead of
    /// silently skipping when this is set.
    pub strict_prerequisites: bool,
}

/// What a validator produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Diagnostics contributed by this validator
    pub diagnostics: Vec<Diagnostic>,
}

/// Failures a validator can signal.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A declared prerequisite was not satisfied
    #[error("prerequisite not met: {0}")]
    PrerequisiteNotMet(String),
    /// The validator could not run against this table
    #[error("validation failed: {0}")]
    Failed(String),
}

/// A synchronous validation rule over a finished symbol table.
pub trait Validator {
    /// Stable name for registry bookkeeping.
    fn name(&self) -> &'static str;

    /// Prerequisites this validator needs; checked before `validate`.
    fn prerequisites(&self) -> &[&'static str] {
        &[]
    }

    /// Runs the rule. The table is read-only at this point.
    fn validate(
        &self,
        table: &SymbolTable,
        options: &ValidationOptions,
    ) -> Result<ValidationResult, ValidationError>;
}

/// Structural invariant checks over a collected table: parent links
/// resolve, resolved references point at stored symbols, and identifier
/// ranges sit inside symbol ranges.
#[derive(Debug, Default)]
pub struct TableInvariantValidator;

impl Validator for TableInvariantValidator {
    fn name(&self) -> &'static str {
        "table-invariants"
    }

    fn validate(
        &self,
        table: &SymbolTable,
        _options: &ValidationOptions,
    ) -> Result<ValidationResult, ValidationError> {
        let mut result = ValidationResult::default();
        let file_uri = table.get_file_uri();

        for symbol in table.get_all_symbols() {
            if let Some(parent) = &symbol.parent_id {
                if table.get_symbol(parent).is_none() {
                    result.diagnostics.push(Diagnostic::warning(
                        format!("symbol '{}' names a missing parent '{}'", symbol.id, parent),
                        symbol.location.identifier_range.start_line,
                        symbol.location.identifier_range.start_column,
                        file_uri,
                    ));
                }
            }
            if !symbol
                .location
                .symbol_range
                .contains_range(symbol.location.identifier_range)
            {
                result.diagnostics.push(Diagnostic::warning(
                    format!("symbol '{}' has an identifier range outside its extent", symbol.id),
                    symbol.location.identifier_range.start_line,
                    symbol.location.identifier_range.start_column,
                    file_uri,
                ));
            }
        }

        for reference in table.get_all_references() {
            if let Some(resolved) = &reference.resolved_symbol_id {
                if table.get_symbol(resolved).is_none() {
                    result.diagnostics.push(Diagnostic::warning(
                        format!(
                            "reference '{}' resolves to a missing symbol '{}'",
                            reference.name, resolved
                        ),
                        reference.location.identifier_range.start_line,
                        reference.location.identifier_range.start_column,
                        file_uri,
                    ));
                }
            }
        }
        Ok(result)
    }
}

/// Runs a validator after checking its prerequisites against the names
/// already satisfied by the host.
pub fn run_validator(
    validator: &dyn Validator,
    table: &SymbolTable,
    options: &ValidationOptions,
    satisfied: &[&str],
) -> Result<ValidationResult, ValidationError> {
    for prerequisite in validator.prerequisites() {
        if !satisfied.contains(prerequisite) {
            if options.strict_prerequisites {
                return Err(ValidationError::PrerequisiteNotMet(prerequisite.to_string()));
            }
            return Ok(ValidationResult::default());
        }
    }
    validator.validate(table, options)
}
