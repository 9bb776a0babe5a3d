//! Declarative batch checks run between extract and load.

use std::collections::HashSet;

use mdf_core::{Batch, ValidationConfig, Value};
use tracing::error;

use crate::error::ValidationError;

/// Applies `not_null` then `unique` rules, stopping at the first violation.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, batch: &Batch) -> Result<(), ValidationError> {
        self.check_not_null(batch)?;
        self.check_unique(batch)
    }

    /// First record (per field, in order) where the field is absent or null.
    fn check_not_null(&self, batch: &Batch) -> Result<(), ValidationError> {
        for field in &self.config.not_null {
            for (row, record) in batch.iter().enumerate() {
                if record.get(field).map_or(true, Value::is_null) {
                    error!(field = %field, row, "not null validation failed");
                    return Err(ValidationError::NotNull {
                        field: field.clone(),
                        row,
                    });
                }
            }
        }
        Ok(())
    }

    /// Records without the field are skipped; an explicit null counts as a value.
    fn check_unique(&self, batch: &Batch) -> Result<(), ValidationError> {
        for field in &self.config.unique {
            let mut seen: HashSet<&Value> = HashSet::with_capacity(batch.len());
            for (row, record) in batch.iter().enumerate() {
                let Some(value) = record.get(field) else {
                    continue;
                };
                if !seen.insert(value) {
                    error!(field = %field, row, value = %value, "unique validation failed");
                    return Err(ValidationError::Duplicate {
                        field: field.clone(),
                        row,
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
