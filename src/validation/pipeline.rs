//! Validation pipeline
//!
//! `validate_data` drives business validation: it walks an ordered mapping
//! of field → validator chain (plus an optional root chain), threading each
//! field's value through its chain and accumulating failures into one
//! `ErrorsList`. Validation is not fail-fast across fields — every declared
//! chain runs to completion and contributes before the pipeline decides
//! success.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{PipelineResult, RequestContext};

use super::errors::{ErrorLocation, ErrorsList};
use super::value::{CleanedData, FieldValue};

/// Trait for business validators
///
/// A validator checks one value against the request context and either
/// passes it on (possibly transformed - existence validators replace ids
/// with loaded entities) or rejects it.
///
/// Rejection protocol: append at least one error at `location` (or, for
/// bulk validators, at element locations beneath it) and return
/// `Ok(None)`. Collaborator failures return `Err` and abort the whole
/// request — they cannot be attributed to a field.
#[async_trait]
pub trait AsyncValidator: Send + Sync {
    async fn validate(
        &self,
        ctx: &RequestContext,
        value: FieldValue,
        location: &ErrorLocation,
        errors: &mut ErrorsList,
    ) -> PipelineResult<Option<FieldValue>>;
}

/// Type alias for stored validators
pub type ArcValidator = Arc<dyn AsyncValidator>;

/// Target of one validator chain
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChainTarget {
    Field(String),
    Root,
}

/// Ordered mapping of field → validator chain
///
/// Chains run in insertion order, and validators within a chain run in the
/// order they were added, so error ordering is a stable function of how the
/// orchestrator (and any extension filters) assembled the set.
#[derive(Clone, Default)]
pub struct ValidatorSet {
    entries: Vec<(ChainTarget, Vec<ArcValidator>)>,
}

impl ValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a validator to a field's chain
    pub fn add_field<V>(&mut self, field: impl Into<String>, validator: V)
    where
        V: AsyncValidator + 'static,
    {
        self.push(ChainTarget::Field(field.into()), Arc::new(validator));
    }

    /// Append a validator to the operation-level chain
    pub fn add_root<V>(&mut self, validator: V)
    where
        V: AsyncValidator + 'static,
    {
        self.push(ChainTarget::Root, Arc::new(validator));
    }

    fn push(&mut self, target: ChainTarget, validator: ArcValidator) {
        if let Some((_, chain)) = self.entries.iter_mut().find(|(t, _)| *t == target) {
            chain.push(validator);
        } else {
            self.entries.push((target, vec![validator]));
        }
    }

    /// Number of declared chains
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared field names, root excluded
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|(target, _)| match target {
            ChainTarget::Field(name) => Some(name.as_str()),
            ChainTarget::Root => None,
        })
    }
}

impl std::fmt::Debug for ValidatorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (target, chain) in &self.entries {
            map.entry(target, &chain.len());
        }
        map.finish()
    }
}

/// Run one validator chain over a value
///
/// Threads the value through the chain in order; stops the chain at the
/// first rejection (the value is no longer trusted) and reports it with
/// `None`. Used by `validate_data` for fields and by bulk validators for
/// elements.
pub async fn run_chain(
    ctx: &RequestContext,
    chain: &[ArcValidator],
    mut value: FieldValue,
    location: &ErrorLocation,
    errors: &mut ErrorsList,
) -> PipelineResult<Option<FieldValue>> {
    for validator in chain {
        match validator.validate(ctx, value, location, errors).await? {
            Some(cleaned) => value = cleaned,
            None => return Ok(None),
        }
    }
    Ok(Some(value))
}

/// Run business validators over cleaned data
///
/// - A field's chain runs only if the field is structurally present;
///   validators never see absent values.
/// - A field whose chain rejects (or appends any error under the field) is
///   excluded from the returned cleaned data; sibling fields still run.
/// - The root chain receives the full cleaned mapping as an entity value
///   and may replace it wholesale; a root failure accumulates at the root
///   location without suppressing field results.
pub async fn validate_data(
    ctx: &RequestContext,
    mut data: CleanedData,
    validators: &ValidatorSet,
    mut errors: ErrorsList,
) -> PipelineResult<(CleanedData, ErrorsList)> {
    for (target, chain) in &validators.entries {
        match target {
            ChainTarget::Field(name) => {
                let Some(value) = data.get(name).cloned() else {
                    continue;
                };
                let location = ErrorLocation::field(name.clone());
                let result = run_chain(ctx, chain, value, &location, &mut errors).await?;
                match result {
                    Some(cleaned) if !errors.has_field_errors(name) => {
                        data.insert(name.clone(), cleaned);
                    }
                    _ => {
                        data.remove(name);
                    }
                }
            }
            ChainTarget::Root => {
                let value = FieldValue::entity(data.clone());
                let result =
                    run_chain(ctx, chain, value, &ErrorLocation::Root, &mut errors).await?;
                if let Some(cleaned) = result {
                    if let Some(replaced) = cleaned.downcast::<CleanedData>() {
                        data = (*replaced).clone();
                    }
                }
            }
        }
    }

    Ok((data, errors))
}
