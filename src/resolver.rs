//! Key-template resolution
//!
//! Expands a [`KeyTemplate`] against the keys currently stored and returns
//! the stored entries it matches. Resolution is positional:
//!
//! 1. Each dimension becomes a candidate list. `Exact` contributes its single
//!    value, `List` its values in the order given, and `Range` the raw column
//!    of stored values at that dimension (one entry per stored key, not
//!    deduplicated) filtered by the bounds.
//! 2. Every `List`/`Range` candidate list must have the same length; `Exact`
//!    values are broadcast to that length.
//! 3. The lists are zipped, not cross-multiplied: the k-th candidate key takes
//!    the k-th entry of every list. Candidates that are not stored are dropped.
//!
//! Step 3 means an independent list on one dimension combined with a range on
//! another only matches where the positions happen to line up, and usually
//! fails step 2 instead. Callers relying on a Cartesian filter must issue one
//! lookup per list value.

use std::cmp::Ordering;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{AritySubject, KDictError, KDictResult};
use crate::key::Key;
use crate::scalar::Scalar;
use crate::template::{KeyTemplate, Selector};

/// Candidate values for one dimension
enum Candidates<'a> {
    /// A single value repeated to the common length
    Broadcast(&'a Scalar),
    /// One value per candidate key
    Column(Vec<&'a Scalar>),
}

impl<'a> Candidates<'a> {
    fn at(&self, position: usize) -> &'a Scalar {
        match self {
            Candidates::Broadcast(value) => *value,
            Candidates::Column(values) => values[position],
        }
    }
}

/// Resolve `template` against `storage`, returning the matched stored entries
/// in storage order, without duplicates.
pub fn resolve<'s, V>(
    template: &KeyTemplate,
    storage: &'s IndexMap<Key, V>,
) -> KDictResult<Vec<(&'s Key, &'s V)>> {
    if let Some((first, _)) = storage.first() {
        if first.len() != template.len() {
            return Err(KDictError::ArityMismatch {
                subject: AritySubject::Template,
                expected: first.len(),
                found: template.len(),
            });
        }
    }

    let dimensions = expand(template, storage)?;
    let width = common_length(&dimensions)?;

    let mut positions: Vec<usize> = (0..width)
        .filter_map(|k| {
            let candidate: Key = dimensions.iter().map(|d| d.at(k).clone()).collect();
            storage.get_index_of(&candidate)
        })
        .collect();
    positions.sort_unstable();
    positions.dedup();

    debug!(
        dimensions = template.len(),
        candidates = width,
        matched = positions.len(),
        "resolved key template"
    );

    Ok(positions
        .into_iter()
        .filter_map(|i| storage.get_index(i))
        .collect())
}

/// Turn each selector into its candidate list
fn expand<'a, V>(
    template: &'a KeyTemplate,
    storage: &'a IndexMap<Key, V>,
) -> KDictResult<Vec<Candidates<'a>>> {
    let mut dimensions = Vec::with_capacity(template.len());
    for (dimension, selector) in template.iter().enumerate() {
        let candidates = match selector {
            Selector::Exact(value) => Candidates::Broadcast(value),
            Selector::List(values) => Candidates::Column(values.iter().collect()),
            Selector::Range { lo, hi } => {
                let column = storage.keys().filter_map(|key| key.get(dimension));
                Candidates::Column(filter_range(lo.as_ref(), hi.as_ref(), column)?)
            }
        };
        if let Candidates::Column(values) = &candidates {
            trace!(dimension, candidates = values.len(), "expanded selector");
        }
        dimensions.push(candidates);
    }
    Ok(dimensions)
}

/// Keep the column values that fall within `[lo, hi]`.
///
/// With both bounds absent every value passes, nulls included. Otherwise
/// nulls are skipped and the remaining values must compare against each
/// present bound; an incomparable value is a type mismatch.
pub fn filter_range<'a>(
    lo: Option<&Scalar>,
    hi: Option<&Scalar>,
    column: impl Iterator<Item = &'a Scalar>,
) -> KDictResult<Vec<&'a Scalar>> {
    let lo = lo.filter(|b| !b.is_null());
    let hi = hi.filter(|b| !b.is_null());

    if lo.is_none() && hi.is_none() {
        return Ok(column.collect());
    }

    let mut kept = Vec::new();
    for value in column {
        if value.is_null() {
            continue;
        }
        if let Some(lo) = lo {
            if !matches!(
                value.compare(lo)?,
                Some(Ordering::Greater | Ordering::Equal)
            ) {
                continue;
            }
        }
        if let Some(hi) = hi {
            if !matches!(value.compare(hi)?, Some(Ordering::Less | Ordering::Equal)) {
                continue;
            }
        }
        kept.push(value);
    }
    Ok(kept)
}

/// Length shared by every multi-valued dimension (1 when all are exact)
fn common_length(dimensions: &[Candidates<'_>]) -> KDictResult<usize> {
    let mut expected: Option<usize> = None;
    for (dimension, candidates) in dimensions.iter().enumerate() {
        let Candidates::Column(values) = candidates else {
            continue;
        };
        match expected {
            None => expected = Some(values.len()),
            Some(len) if len != values.len() => {
                return Err(KDictError::ArityMismatch {
                    subject: AritySubject::Selection { dimension },
                    expected: len,
                    found: values.len(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(expected.unwrap_or(1))
}
