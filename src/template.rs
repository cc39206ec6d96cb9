//! Key templates
//!
//! A [`KeyTemplate`] holds one [`Selector`] per dimension. Selectors are
//! usually built through `From` conversions so that a template reads like
//! an index expression:
//!
//! ```
//! use kdict::{template, Selector};
//!
//! // fold 1, labels 5 and 10, any split
//! let t = template![1, [5, 10], ..];
//! assert_eq!(t.len(), 3);
//! assert!(matches!(t[2], Selector::Range { lo: None, hi: None }));
//! ```

use std::ops::{Deref, RangeFrom, RangeFull, RangeInclusive, RangeToInclusive};

use crate::key::Key;
use crate::scalar::Scalar;

/// Filter for a single key dimension
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Match one value
    Exact(Scalar),
    /// Match each listed value, positionally
    List(Vec<Scalar>),
    /// Match stored values within inclusive bounds.
    ///
    /// With both bounds absent the range matches everything, nulls included.
    /// With any bound present, nulls never match.
    Range {
        lo: Option<Scalar>,
        hi: Option<Scalar>,
    },
}

impl Selector {
    pub fn exact(value: impl Into<Scalar>) -> Self {
        Selector::Exact(value.into())
    }

    pub fn list<T: Into<Scalar>>(values: impl IntoIterator<Item = T>) -> Self {
        Selector::List(values.into_iter().map(Into::into).collect())
    }

    /// Inclusive range. A `Null` bound counts as absent.
    pub fn range<L: Into<Scalar>, H: Into<Scalar>>(lo: Option<L>, hi: Option<H>) -> Self {
        Selector::Range {
            lo: lo.map(Into::into).filter(|b| !b.is_null()),
            hi: hi.map(Into::into).filter(|b| !b.is_null()),
        }
    }

    /// Open range: no filter on this dimension
    pub fn all() -> Self {
        Selector::Range { lo: None, hi: None }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Selector::Exact(_))
    }
}

macro_rules! selector_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Selector {
                fn from(value: $t) -> Self {
                    Selector::Exact(Scalar::from(value))
                }
            }
        )*
    };
}

selector_from_scalar!(
    i8, i16, i32, i64, u8, u16, u32, bool, f32, f64, char, &str, String, Scalar
);

impl<T: Into<Scalar>, const N: usize> From<[T; N]> for Selector {
    fn from(values: [T; N]) -> Self {
        Selector::list(values)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Selector {
    fn from(values: Vec<T>) -> Self {
        Selector::list(values)
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::all()
    }
}

impl<T: Into<Scalar>> From<RangeInclusive<T>> for Selector {
    fn from(range: RangeInclusive<T>) -> Self {
        let (lo, hi) = range.into_inner();
        Selector::range(Some(lo), Some(hi))
    }
}

impl<T: Into<Scalar>> From<RangeFrom<T>> for Selector {
    fn from(range: RangeFrom<T>) -> Self {
        Selector::range(Some(range.start), None::<Scalar>)
    }
}

impl<T: Into<Scalar>> From<RangeToInclusive<T>> for Selector {
    fn from(range: RangeToInclusive<T>) -> Self {
        Selector::range(None::<Scalar>, Some(range.end))
    }
}

/// Per-lookup filter: one selector per key dimension
#[derive(Debug, Clone, PartialEq)]
pub struct KeyTemplate(Vec<Selector>);

impl KeyTemplate {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self(selectors)
    }

    /// Number of dimensions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every selector is `Exact`, i.e. the template names one key
    pub fn is_exact(&self) -> bool {
        self.0.iter().all(Selector::is_exact)
    }

    /// The single key named by an all-exact template
    pub fn as_key(&self) -> Option<Key> {
        self.0
            .iter()
            .map(|s| match s {
                Selector::Exact(v) => Some(v.clone()),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Key::from)
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.0
    }
}

impl Deref for KeyTemplate {
    type Target = [Selector];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Selector>> for KeyTemplate {
    fn from(selectors: Vec<Selector>) -> Self {
        Self(selectors)
    }
}

impl From<Key> for KeyTemplate {
    fn from(key: Key) -> Self {
        key.into_inner().into_iter().map(Selector::Exact).collect()
    }
}

impl From<&Key> for KeyTemplate {
    fn from(key: &Key) -> Self {
        key.iter().cloned().map(Selector::Exact).collect()
    }
}

impl FromIterator<Selector> for KeyTemplate {
    fn from_iter<I: IntoIterator<Item = Selector>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Build a [`KeyTemplate`] from selector-convertible expressions:
/// scalars, arrays/vectors (lists), `..`, `a..=b`, `a..` and `..=b` (ranges).
#[macro_export]
macro_rules! template {
    ($($sel:expr),* $(,)?) => {
        $crate::KeyTemplate::new(vec![$($crate::Selector::from($sel)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;

    #[test]
    fn test_macro_mixes_selector_kinds() {
        let t = template![1, [5, 10], "train", ..];
        assert_eq!(
            t.selectors(),
            &[
                Selector::Exact(Scalar::Int(1)),
                Selector::List(vec![Scalar::Int(5), Scalar::Int(10)]),
                Selector::Exact(Scalar::from("train")),
                Selector::all(),
            ]
        );
        assert!(!t.is_exact());
    }

    #[test]
    fn test_rust_ranges_are_inclusive_bounds() {
        assert_eq!(
            Selector::from(1..=9),
            Selector::Range {
                lo: Some(Scalar::Int(1)),
                hi: Some(Scalar::Int(9))
            }
        );
        assert_eq!(
            Selector::from(3..),
            Selector::Range {
                lo: Some(Scalar::Int(3)),
                hi: None
            }
        );
        assert_eq!(
            Selector::from(..=6),
            Selector::Range {
                lo: None,
                hi: Some(Scalar::Int(6))
            }
        );
    }

    #[test]
    fn test_named_constructors() {
        assert_eq!(Selector::exact("svm"), Selector::from("svm"));
        assert!(Selector::exact(3).is_exact());
        assert_eq!(Selector::list(["a", "b"]), Selector::from(vec!["a", "b"]));
        assert!(!Selector::all().is_exact());
    }

    #[test]
    fn test_null_bound_is_absent() {
        assert_eq!(
            Selector::range(Some(Scalar::Null), Some(4)),
            Selector::Range {
                lo: None,
                hi: Some(Scalar::Int(4))
            }
        );
    }

    #[test]
    fn test_exact_template_round_trips_key() {
        let k = key![1, "test", "svm"];
        let t = KeyTemplate::from(&k);
        assert!(t.is_exact());
        assert_eq!(t.as_key(), Some(k));
        assert_eq!(template![1, ..].as_key(), None);
    }
}
