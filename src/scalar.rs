//! Key components
//!
//! A [`Scalar`] is one slot of a composite key. Keys may mix kinds across
//! dimensions, and even within one dimension, so the type is a closed enum
//! rather than a generic parameter. `Null` is an ordinary key component that
//! fails every ordered comparison.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{KDictError, KDictResult};

/// One component of a composite key
#[derive(Debug, Clone)]
pub enum Scalar {
    /// Absent value: `null`
    Null,
    /// Boolean: true, false
    Bool(bool),
    /// Integer: 42, -17
    Int(i64),
    /// Floating point: 0.25
    Float(f64),
    /// Text: 'train'
    Text(String),
}

impl Scalar {
    /// Kind name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "text",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Order two scalars for range filtering.
    ///
    /// Integers and floats compare numerically and exactly with each other;
    /// booleans and text only compare within their own kind. Every other
    /// pairing, including anything against `Null`, is a
    /// [`KDictError::TypeMismatch`].
    /// `Ok(None)` means well-typed but unordered (a NaN was involved).
    pub fn compare(&self, other: &Scalar) -> KDictResult<Option<Ordering>> {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => Ok(Some(a.cmp(b))),
            (Scalar::Int(a), Scalar::Float(b)) => Ok(cmp_int_float(*a, *b)),
            (Scalar::Float(a), Scalar::Int(b)) => {
                Ok(cmp_int_float(*b, *a).map(Ordering::reverse))
            }
            (Scalar::Float(a), Scalar::Float(b)) => Ok(a.partial_cmp(b)),
            (Scalar::Bool(a), Scalar::Bool(b)) => Ok(Some(a.cmp(b))),
            (Scalar::Text(a), Scalar::Text(b)) => Ok(Some(a.cmp(b))),
            _ => Err(KDictError::TypeMismatch {
                left: self.kind(),
                right: other.kind(),
            }),
        }
    }

    /// Identity of a numeric scalar: integral floats collapse onto `Int`
    fn numeric_identity(&self) -> Option<NumericIdentity> {
        match self {
            Scalar::Int(i) => Some(NumericIdentity::Int(*i)),
            Scalar::Float(x) => Some(match float_as_int(*x) {
                Some(i) => NumericIdentity::Int(i),
                None => NumericIdentity::Bits(x.to_bits()),
            }),
            _ => None,
        }
    }
}

#[derive(PartialEq, Eq, Hash)]
enum NumericIdentity {
    Int(i64),
    Bits(u64),
}

// 2^63 as f64; every float in [-2^63, 2^63) with no fraction fits i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// The integer equal to `x`, when there is one
fn float_as_int(x: f64) -> Option<i64> {
    if x.is_finite() && x.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&x) {
        Some(x as i64)
    } else {
        None
    }
}

/// Exact ordering of an integer against a float, without rounding the integer
fn cmp_int_float(i: i64, x: f64) -> Option<Ordering> {
    if x.is_nan() {
        return None;
    }
    if let Some(xi) = float_as_int(x) {
        return Some(i.cmp(&xi));
    }
    if x >= I64_BOUND {
        return Some(Ordering::Less);
    }
    if x < -I64_BOUND {
        return Some(Ordering::Greater);
    }
    // Non-integral and in range: i can never equal x.
    if i <= x.floor() as i64 {
        Some(Ordering::Less)
    } else {
        Some(Ordering::Greater)
    }
}

// Integers and integral floats are one key (1 == 1.0); other floats compare
// by bit pattern so that every scalar can be a map key.
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            _ => match (self.numeric_identity(), other.numeric_identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Scalar::Null => 0u8.hash(state),
            Scalar::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Scalar::Int(_) | Scalar::Float(_) => {
                2u8.hash(state);
                self.numeric_identity().hash(state);
            }
            Scalar::Text(s) => {
                3u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::Text(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
        }
    }
}

macro_rules! scalar_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(value: $t) -> Self {
                    Scalar::Int(i64::from(value))
                }
            }
        )*
    };
}

scalar_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(f64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<char> for Scalar {
    fn from(value: char) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&Scalar> for Scalar {
    fn from(value: &Scalar) -> Self {
        value.clone()
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}
