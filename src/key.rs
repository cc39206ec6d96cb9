//! Composite keys

use std::fmt;
use std::ops::Deref;

use crate::scalar::Scalar;

/// A fixed-length composite key: one [`Scalar`] per dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Key(Vec<Scalar>);

impl Key {
    pub fn new(parts: Vec<Scalar>) -> Self {
        Self(parts)
    }

    /// Number of dimensions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Component at `dimension`, if the key is long enough
    pub fn get(&self, dimension: usize) -> Option<&Scalar> {
        self.0.get(dimension)
    }

    /// Build a shorter key from the given dimensions, in the given order.
    ///
    /// Callers check bounds first; an out-of-range dimension panics.
    pub(crate) fn pick(&self, dimensions: &[usize]) -> Key {
        dimensions.iter().map(|&d| self.0[d].clone()).collect()
    }

    pub fn into_inner(self) -> Vec<Scalar> {
        self.0
    }
}

impl Deref for Key {
    type Target = [Scalar];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Scalar>> for Key {
    fn from(parts: Vec<Scalar>) -> Self {
        Self(parts)
    }
}

impl FromIterator<Scalar> for Key {
    fn from_iter<I: IntoIterator<Item = Scalar>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Key {
    type Item = &'a Scalar;
    type IntoIter = std::slice::Iter<'a, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Rendered like a tuple: `(1, 'train', null)`
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", part)?;
        }
        if self.0.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

/// Build a [`Key`] from scalar-convertible expressions.
///
/// ```
/// use kdict::{key, Scalar};
///
/// let k = key![1, "train", Scalar::Null];
/// assert_eq!(k.len(), 3);
/// ```
#[macro_export]
macro_rules! key {
    ($($part:expr),* $(,)?) => {
        $crate::Key::new(vec![$($crate::Scalar::from($part)),*])
    };
}
