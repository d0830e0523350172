//! Mutates process env vars, so it lives in its own test binary.
use std::env;
use std::fs;

use tempfile::TempDir;

use mmrag_core::config::{fake_embeddings_requested, Config, EmbeddingSettings, FAKE_EMBEDDINGS_ENV};

#[test]
fn production_rejects_fake_embeddings_from_any_source() {
    let tmp = TempDir::new().unwrap();
    env::set_var("RUST_ENV", "prod");

    env::set_var(FAKE_EMBEDDINGS_ENV, "1");
    assert!(fake_embeddings_requested(&EmbeddingSettings::default()));
    let err = Config::load_from(tmp.path()).err().expect("env switch must be rejected in prod");
    assert!(err.to_string().contains("production"), "got {err}");
    env::remove_var(FAKE_EMBEDDINGS_ENV);

    fs::write(tmp.path().join("config.prod.toml"), "[embedding]\nuse_fake = true\n").unwrap();
    assert!(Config::load_from(tmp.path()).is_err(), "config key must be rejected in prod");
    fs::remove_file(tmp.path().join("config.prod.toml")).unwrap();

    assert!(Config::load_from(tmp.path()).is_ok());
    env::set_var("RUST_ENV", "dev");
    env::set_var(FAKE_EMBEDDINGS_ENV, "true");
    assert!(Config::load_from(tmp.path()).is_ok(), "fakes stay allowed outside prod");
    env::remove_var(FAKE_EMBEDDINGS_ENV);
    env::remove_var("RUST_ENV");
}
