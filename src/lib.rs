//! kdict: a dict with k-dimensional keys
//!
//! Values are stored under fixed-length composite keys and can be retrieved
//! one at a time or as subsets filtered per dimension, similar to multi-axis
//! indexing on a table but backed by a flat ordered map:
//! - `Exact` selects a single value in a dimension
//! - `List` selects several values, matched positionally
//! - `Range` selects stored values within inclusive bounds (`..` matches all)
//!
//! ```
//! use kdict::{key, template, KDict};
//!
//! let mut d = KDict::new();
//! for fold_id in 0..3 {
//!     for label in ["train", "test"] {
//!         for model in ["randomforest", "svm"] {
//!             d.insert(key![fold_id, label, model], ()).unwrap();
//!         }
//!     }
//! }
//! assert_eq!(d.len(), 12);
//! assert_eq!(d.select(&template![0, .., ..]).unwrap().len(), 4);
//! assert_eq!(d.select(&template![.., .., "randomforest"]).unwrap().len(), 6);
//! ```
//!
//! The crate emits `tracing` events at debug/trace level and never installs a
//! subscriber.

pub mod error;
pub mod kdict;
pub mod key;
pub mod resolver;
pub mod scalar;
pub mod template;

pub use crate::kdict::{KDict, Lookup};
pub use error::{AritySubject, KDictError, KDictResult};
pub use key::Key;
pub use scalar::Scalar;
pub use template::{KeyTemplate, Selector};
