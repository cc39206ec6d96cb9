//! The k-dimensional dict container

use std::ops::Index;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::error::{AritySubject, KDictError, KDictResult};
use crate::key::Key;
use crate::resolver;
use crate::scalar::Scalar;
use crate::template::KeyTemplate;

/// Result of [`KDict::get`]
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a, V> {
    /// An all-exact template named a single stored value
    Value(&'a V),
    /// A template with at least one list or range matched zero or more entries
    Subset(KDict<V>),
}

impl<'a, V> Lookup<'a, V> {
    pub fn value(self) -> Option<&'a V> {
        match self {
            Lookup::Value(v) => Some(v),
            Lookup::Subset(_) => None,
        }
    }

    pub fn subset(self) -> Option<KDict<V>> {
        match self {
            Lookup::Value(_) => None,
            Lookup::Subset(d) => Some(d),
        }
    }

    pub fn is_subset(&self) -> bool {
        matches!(self, Lookup::Subset(_))
    }
}

/// A dict with k-dimensional keys, sliceable along any of those dimensions.
///
/// Every key has the same length (the container's arity), fixed by the first
/// key ever stored. Entries keep insertion order; overwriting a key keeps its
/// position and removing a key keeps the order of the rest.
///
/// ```
/// use kdict::{key, template, KDict};
///
/// let mut d = KDict::new();
/// for fold in 0..3 {
///     for label in ["train", "test"] {
///         d.insert(key![fold, label], format!("{fold}-{label}")).unwrap();
///     }
/// }
/// let train = d.select(&template![.., "train"]).unwrap();
/// assert_eq!(train.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KDict<V> {
    arity: Option<usize>,
    data: IndexMap<Key, V>,
}

impl<V> Default for KDict<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> KDict<V> {
    /// Create an empty container; arity is fixed by the first insertion
    pub fn new() -> Self {
        Self {
            arity: None,
            data: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arity: None,
            data: IndexMap::with_capacity(capacity),
        }
    }

    /// Create a container from initial entries.
    ///
    /// Arity comes from the first key; any key of a different length fails the
    /// whole construction. Later duplicates overwrite earlier ones.
    pub fn try_from_entries<I>(entries: I) -> KDictResult<Self>
    where
        I: IntoIterator<Item = (Key, V)>,
    {
        let mut dict = Self::new();
        for (key, value) in entries {
            dict.insert(key, value)?;
        }
        Ok(dict)
    }

    /// Create a container from initial entries plus named entries.
    ///
    /// Each name becomes the one-dimensional key `(name,)`, so named entries
    /// only mix with initial entries whose keys also have length one.
    pub fn with_named<I, N, S>(initial: I, named: N) -> KDictResult<Self>
    where
        I: IntoIterator<Item = (Key, V)>,
        N: IntoIterator<Item = (S, V)>,
        S: Into<String>,
    {
        let named = named
            .into_iter()
            .map(|(name, value)| (Key::new(vec![Scalar::Text(name.into())]), value));
        Self::try_from_entries(initial.into_iter().chain(named))
    }

    /// Key length shared by every entry, once any key has been seen
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.data.contains_key(key)
    }

    fn check_arity(&self, subject: AritySubject, found: usize) -> KDictResult<()> {
        match self.arity {
            Some(expected) if expected != found => Err(KDictError::ArityMismatch {
                subject,
                expected,
                found,
            }),
            _ => Ok(()),
        }
    }

    fn check_dimension(&self, dimension: usize) -> KDictResult<()> {
        match self.arity {
            Some(arity) if dimension >= arity => {
                Err(KDictError::DimensionOutOfRange { dimension, arity })
            }
            _ => Ok(()),
        }
    }

    /// Store `value` under `key`, returning the value it replaced.
    ///
    /// The first key stored fixes the arity; a key of any other length is
    /// rejected and storage is left untouched.
    pub fn insert(&mut self, key: Key, value: V) -> KDictResult<Option<V>> {
        self.check_arity(AritySubject::Key, key.len())?;
        self.arity.get_or_insert(key.len());
        Ok(self.data.insert(key, value))
    }

    /// Insert every entry in order.
    ///
    /// Not atomic: entries before a failing one stay applied.
    pub fn update<I>(&mut self, entries: I) -> KDictResult<()>
    where
        I: IntoIterator<Item = (Key, V)>,
    {
        let mut applied = 0usize;
        for (key, value) in entries {
            self.insert(key, value)?;
            applied += 1;
        }
        debug!(applied, len = self.data.len(), "applied update");
        Ok(())
    }

    /// Remove and return the value stored under `key`
    pub fn remove(&mut self, key: &Key) -> KDictResult<V> {
        self.data
            .shift_remove(key)
            .ok_or_else(|| KDictError::KeyNotFound { key: key.clone() })
    }

    /// Value stored under exactly `key`
    pub fn get_exact(&self, key: &Key) -> KDictResult<&V> {
        self.check_arity(AritySubject::Key, key.len())?;
        self.data
            .get(key)
            .ok_or_else(|| KDictError::KeyNotFound { key: key.clone() })
    }

    pub fn get_exact_mut(&mut self, key: &Key) -> KDictResult<&mut V> {
        self.check_arity(AritySubject::Key, key.len())?;
        self.data
            .get_mut(key)
            .ok_or_else(|| KDictError::KeyNotFound { key: key.clone() })
    }

    /// All keys, in storage order
    pub fn keys(&self) -> Vec<&Key> {
        self.data.keys().collect()
    }

    /// Values at one dimension of every key, in storage order.
    ///
    /// With `unique`, repeated values are dropped keeping first occurrences.
    pub fn keys_at(&self, dimension: usize, unique: bool) -> KDictResult<Vec<Scalar>> {
        self.check_dimension(dimension)?;
        let column = self.data.keys().filter_map(|key| key.get(dimension)).cloned();
        Ok(if unique {
            column.collect::<IndexSet<_>>().into_iter().collect()
        } else {
            column.collect()
        })
    }

    /// Keys narrowed to the given dimensions (in the order given), in storage
    /// order. With `unique`, repeated tuples are dropped keeping first
    /// occurrences.
    pub fn keys_across(&self, dimensions: &[usize], unique: bool) -> KDictResult<Vec<Key>> {
        for &dimension in dimensions {
            self.check_dimension(dimension)?;
        }
        let projected = self.data.keys().map(|key| key.pick(dimensions));
        Ok(if unique {
            projected.collect::<IndexSet<_>>().into_iter().collect()
        } else {
            projected.collect()
        })
    }

    pub fn values(&self) -> Vec<&V> {
        self.data.values().collect()
    }

    pub fn items(&self) -> Vec<(&Key, &V)> {
        self.data.iter().collect()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, V> {
        self.data.iter()
    }

    /// Borrow the backing map
    pub fn as_map(&self) -> &IndexMap<Key, V> {
        &self.data
    }

    /// Hand back the backing map itself, giving up the arity checks
    pub fn eject(self) -> IndexMap<Key, V> {
        self.data
    }
}

impl<V: Clone> KDict<V> {
    /// Look up by template.
    ///
    /// An all-exact template returns the single stored value (or
    /// `KeyNotFound`). A template with any list or range returns a new
    /// container holding clones of the matched entries, possibly empty.
    pub fn get(&self, template: impl Into<KeyTemplate>) -> KDictResult<Lookup<'_, V>> {
        let template = template.into();
        self.check_arity(AritySubject::Template, template.len())?;

        match template.as_key() {
            Some(key) => self.get_exact(&key).map(Lookup::Value),
            None => self.select(&template).map(Lookup::Subset),
        }
    }

    /// Entries matching `template`, as an independent container.
    ///
    /// Matched entries keep their relative storage order. Values are cloned;
    /// store `Rc`/`Arc` values to share them between parent and subset.
    pub fn select(&self, template: &KeyTemplate) -> KDictResult<KDict<V>> {
        self.check_arity(AritySubject::Template, template.len())?;

        let data: IndexMap<Key, V> = resolver::resolve(template, &self.data)?
            .into_iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(KDict {
            arity: data.first().map(|(key, _)| key.len()),
            data,
        })
    }
}

impl<V> Index<&Key> for KDict<V> {
    type Output = V;

    /// Panics when `key` is absent, like `HashMap` indexing
    fn index(&self, key: &Key) -> &V {
        match self.data.get(key) {
            Some(value) => value,
            None => panic!("key not found: {}", key),
        }
    }
}

impl<'a, V> IntoIterator for &'a KDict<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = indexmap::map::Iter<'a, Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<V> TryFrom<IndexMap<Key, V>> for KDict<V> {
    type Error = KDictError;

    fn try_from(map: IndexMap<Key, V>) -> KDictResult<Self> {
        Self::try_from_entries(map)
    }
}

impl<V> TryFrom<Vec<(Key, V)>> for KDict<V> {
    type Error = KDictError;

    fn try_from(entries: Vec<(Key, V)>) -> KDictResult<Self> {
        Self::try_from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{key, template};
    use pretty_assertions::assert_eq;

    fn folds() -> KDict<&'static str> {
        let mut d = KDict::new();
        d.insert(key![1, 2, "train"], "a").unwrap();
        d.insert(key![1, 5, "train"], "b").unwrap();
        d.insert(key![1, 10, "train"], "c").unwrap();
        d.insert(key![1, 10, "test"], "d").unwrap();
        d
    }

    #[test]
    fn test_arity_fixed_by_first_insert() {
        let mut d = KDict::new();
        assert_eq!(d.arity(), None);
        d.insert(key![1, 2, 3], "test").unwrap();
        assert_eq!(d.arity(), Some(3));

        let err = d.insert(key![1, 2], "test").unwrap_err();
        assert!(err.is_arity_mismatch());
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut d = folds();
        let old = d.insert(key![1, 5, "train"], "B").unwrap();
        assert_eq!(old, Some("b"));
        assert_eq!(d.values(), vec![&"a", &"B", &"c", &"d"]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut d = folds();
        assert_eq!(d.remove(&key![1, 5, "train"]).unwrap(), "b");
        assert_eq!(d.values(), vec![&"a", &"c", &"d"]);
        assert!(d.remove(&key![1, 5, "train"]).unwrap_err().is_key_not_found());
    }

    #[test]
    fn test_arity_survives_emptying() {
        let mut d = KDict::new();
        d.insert(key![1, 2], ()).unwrap();
        d.remove(&key![1, 2]).unwrap();
        assert!(d.is_empty());
        assert!(d.insert(key![1], ()).is_err());
    }

    #[test]
    fn test_get_dispatches_on_template_shape() {
        let d = folds();
        assert_eq!(d.get(key![1, 10, "test"]).unwrap(), Lookup::Value(&"d"));

        let subset = d.get(template![1, [5, 10], "train"]).unwrap();
        assert!(subset.is_subset());
        assert_eq!(subset.subset().unwrap().values(), vec![&"b", &"c"]);
    }

    #[test]
    fn test_exact_miss_is_key_not_found() {
        let d = folds();
        let err = d.get(key![1, 3, "train"]).unwrap_err();
        assert_eq!(
            err,
            KDictError::KeyNotFound {
                key: key![1, 3, "train"]
            }
        );
    }

    #[test]
    fn test_empty_subset_is_not_an_error() {
        let d = folds();
        let subset = d.select(&template![2, .., ..]).unwrap();
        assert!(subset.is_empty());
        assert_eq!(subset.arity(), None);
    }

    #[test]
    fn test_int_range_against_int_column() {
        let d = folds();
        let subset = d.select(&template![1, 1..=9, "train"]).unwrap();
        assert_eq!(subset.len(), 2);
    }

    #[test]
    fn test_keys_at_unique_preserves_first_occurrence() {
        let d = folds();
        assert_eq!(
            d.keys_at(2, true).unwrap(),
            vec![Scalar::from("train"), Scalar::from("test")]
        );
        assert_eq!(d.keys_at(1, false).unwrap().len(), 4);
    }

    #[test]
    fn test_keys_across_builds_tuples() {
        let d = folds();
        assert_eq!(
            d.keys_across(&[2, 0], true).unwrap(),
            vec![key!["train", 1], key!["test", 1]]
        );
    }

    #[test]
    fn test_projection_out_of_range() {
        let d = folds();
        assert_eq!(
            d.keys_at(3, false).unwrap_err(),
            KDictError::DimensionOutOfRange {
                dimension: 3,
                arity: 3
            }
        );
        assert!(KDict::<()>::new().keys_at(5, true).unwrap().is_empty());
    }

    #[test]
    fn test_named_entries_are_one_dimensional() {
        let d = KDict::with_named(vec![(key!["a"], 2)], vec![("b", 7)]).unwrap();
        assert_eq!(d.arity(), Some(1));
        assert_eq!(d[&key!["b"]], 7);

        let err = KDict::with_named(vec![(key!["a", 2], 5)], vec![("b", 6)]).unwrap_err();
        assert!(err.is_arity_mismatch());
    }

    #[test]
    fn test_integral_float_finds_int_key() {
        let mut d = KDict::new();
        d.insert(key![1, "a"], "one").unwrap();

        assert_eq!(d.get_exact(&key![1.0, "a"]).unwrap(), &"one");
        assert_eq!(d.select(&template![[1.0], ["a"]]).unwrap().len(), 1);
        assert_eq!(d.select(&template![1.0..=1.0, "a"]).unwrap().len(), 1);
        assert!(d.get_exact(&key![1.5, "a"]).unwrap_err().is_key_not_found());

        // Same key: overwrite in place, keeping the stored form
        assert_eq!(d.insert(key![1.0, "a"], "uno").unwrap(), Some("one"));
        assert_eq!(d.len(), 1);
        assert_eq!(d.keys(), vec![&key![1, "a"]]);
        assert!(matches!(d.keys()[0][0], Scalar::Int(1)));
    }

    #[test]
    fn test_get_exact_mut_updates_in_place() {
        let mut d = folds();
        *d.get_exact_mut(&key![1, 2, "train"]).unwrap() = "A";
        assert_eq!(d[&key![1, 2, "train"]], "A");

        assert!(d
            .get_exact_mut(&key![1, 3, "train"])
            .unwrap_err()
            .is_key_not_found());
        assert_eq!(
            d.get_exact_mut(&key![1, 2]).unwrap_err(),
            KDictError::ArityMismatch {
                subject: AritySubject::Key,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_with_capacity_starts_empty() {
        let mut d = KDict::with_capacity(8);
        assert!(d.is_empty());
        assert_eq!(d.arity(), None);
        d.insert(key!["x", 1], 1).unwrap();
        assert_eq!(d.arity(), Some(2));
        assert!(d.as_map().capacity() >= 8);
    }

    #[test]
    fn test_as_map_borrows_backing_map() {
        let d = folds();
        let map = d.as_map();
        assert_eq!(map.len(), d.len());
        assert_eq!(map.get(&key![1, 10, "test"]), Some(&"d"));
    }

    #[test]
    fn test_eject_returns_backing_map() {
        let d = folds();
        let map = d.eject();
        assert_eq!(map.len(), 4);
        assert_eq!(map.get_index(0).map(|(_, v)| *v), Some("a"));
    }
}
