//! Shared fixtures for kdict integration tests

#![allow(dead_code)]

use kdict::{key, KDict};

/// Initialize logging for tests (RUST_LOG overrides the default filter)
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kdict=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Cross-validation grid: fold id x split label x model name (12 entries)
pub fn model_grid() -> KDict<String> {
    let mut d = KDict::new();
    for fold_id in 0..3 {
        for fold_label in ["train", "test"] {
            for model_name in ["randomforest", "svm"] {
                d.insert(
                    key![fold_id, fold_label, model_name],
                    format!("{fold_id}/{fold_label}/{model_name}"),
                )
                .expect("grid keys share one arity");
            }
        }
    }
    d
}

/// Keys (1, 2, train), (1, 5, train), (1, 10, train), (1, 10, test)
pub fn label_grid() -> KDict<&'static str> {
    KDict::try_from(vec![
        (key![1, 2, "train"], "a"),
        (key![1, 5, "train"], "b"),
        (key![1, 10, "train"], "c"),
        (key![1, 10, "test"], "d"),
    ])
    .expect("label keys share one arity")
}
