//! Bulk validator

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{PipelineError, PipelineResult, RequestContext};
use crate::validation::errors::{ErrorLocation, ErrorsList};
use crate::validation::pipeline::{run_chain, ArcValidator, AsyncValidator};
use crate::validation::value::FieldValue;

/// Applies an inner validator chain to every element of a list field
///
/// Elements validate independently: a failure on element `i` is recorded at
/// `field[i]` and never stops siblings from validating, so one request
/// surfaces every bad element at once. Any element failure rejects the
/// whole field (its list is no longer trustworthy), but only after every
/// element has been visited.
///
/// An empty list is a no-op that yields an empty list.
pub struct BulkValidator {
    validators: Vec<ArcValidator>,
}

impl BulkValidator {
    pub fn new<V: AsyncValidator + 'static>(validator: V) -> Self {
        Self {
            validators: vec![Arc::new(validator)],
        }
    }

    /// Append another validator to the per-element chain
    pub fn and<V: AsyncValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }
}

#[async_trait]
impl AsyncValidator for BulkValidator {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>> {
        let items = value
            .as_list()
            .ok_or_else(|| PipelineError::unexpected_value("bulk validator expects a list"))?;

        let mut cleaned = Vec::with_capacity(items.len());
        let mut rejected = false;

        for (index, item) in items.iter().enumerate() {
            let item_location = location.item(index).ok_or_else(|| {
                PipelineError::unexpected_value("bulk validators attach to field locations")
            })?;

            match run_chain(ctx, &self.validators, item.clone(), &item_location, errors).await? {
                Some(value) => cleaned.push(value),
                None => rejected = true,
            }
        }

        if rejected {
            Ok(None)
        } else {
            Ok(Some(FieldValue::List(cleaned)))
        }
    }
}
