//! The shipped config file must stay loadable.

use std::path::{Path, PathBuf};

use unmo_bot::config::load_from;

#[test]
fn test_default_config_file_exists() {
    assert!(Path::new("config/default.toml").is_file(), "config/default.toml missing");
}

#[test]
fn test_default_config_parses() {
    let cfg = load_from(Path::new("config/default.toml"), None, None).unwrap();
    assert_eq!(cfg.bot_name, "proto");
    assert_eq!(cfg.dictionary_paths().random, PathBuf::from("dics/random.txt"));
}

#[test]
fn test_demo_corpus_exists() {
    let text = std::fs::read_to_string("demos/corpus.txt").unwrap();
    assert!(text.lines().any(|l| !l.trim().is_empty()), "demos/corpus.txt should not be empty");
}
