//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `UNMO_DICT_DIR` and `UNMO_LOG_LEVEL` env overrides.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::dictionary::DictionaryPaths;
use crate::error::AppError;
use crate::logger;

/// Fully-resolved bot configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_name: String,
    /// Directory holding the three dictionary files (already expanded, no `~`).
    pub dict_dir: PathBuf,
    pub log_level: String,
    /// Append logs here instead of stderr when set.
    pub log_file: Option<PathBuf>,
    pub random_file: String,
    pub pattern_file: String,
    pub template_file: String,
    /// Maximum number of corpus lines queued by `:train`.
    pub training_queue_cap: usize,
}

impl Config {
    /// Full paths of the dictionary files.
    pub fn dictionary_paths(&self) -> DictionaryPaths {
        DictionaryPaths {
            random: self.dict_dir.join(&self.random_file),
            pattern: self.dict_dir.join(&self.pattern_file),
            template: self.dict_dir.join(&self.template_file),
        }
    }
}

/// Raw TOML shape, `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    bot: RawBot,
    #[serde(default)]
    dictionary: RawDictionary,
    #[serde(default)]
    training: RawTraining,
}

#[derive(Deserialize)]
struct RawBot {
    name: String,
    #[serde(default = "default_dict_dir")]
    dict_dir: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    log_file: Option<String>,
}

#[derive(Deserialize)]
struct RawDictionary {
    #[serde(default = "default_random_file")]
    random_file: String,
    #[serde(default = "default_pattern_file")]
    pattern_file: String,
    #[serde(default = "default_template_file")]
    template_file: String,
}

impl Default for RawDictionary {
    fn default() -> Self {
        Self {
            random_file: default_random_file(),
            pattern_file: default_pattern_file(),
            template_file: default_template_file(),
        }
    }
}

#[derive(Deserialize)]
struct RawTraining {
    #[serde(default = "default_queue_cap")]
    queue_cap: usize,
}

impl Default for RawTraining {
    fn default() -> Self {
        Self { queue_cap: default_queue_cap() }
    }
}

fn default_dict_dir() -> String { "dics".to_string() }
fn default_log_level() -> String { "warn".to_string() }
fn default_random_file() -> String { "random.txt".to_string() }
fn default_pattern_file() -> String { "pattern.txt".to_string() }
fn default_template_file() -> String { "template.txt".to_string() }
fn default_queue_cap() -> usize { 10_000 }

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let dict_dir_override = env::var("UNMO_DICT_DIR").ok();
    let log_level_override = env::var("UNMO_LOG_LEVEL").ok();
    load_from(
        Path::new("config/default.toml"),
        dict_dir_override.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader. Accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    dict_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let b = parsed.bot;
    if b.name.trim().is_empty() {
        return Err(AppError::Config("bot.name must not be empty".into()));
    }
    if parsed.training.queue_cap == 0 {
        return Err(AppError::Config("training.queue_cap must be at least 1".into()));
    }

    let dict_dir = expand_home(dict_dir_override.unwrap_or(&b.dict_dir));
    let log_level = log_level_override.unwrap_or(&b.log_level).trim().to_lowercase();
    if logger::parse_level(&log_level).is_err() {
        return Err(AppError::Config(format!(
            "bot.log_level '{log_level}' is not one of off, error, warn, info, debug, trace"
        )));
    }

    Ok(Config {
        bot_name: b.name,
        dict_dir,
        log_level,
        log_file: b.log_file.map(|p| expand_home(&p)),
        random_file: parsed.dictionary.random_file,
        pattern_file: parsed.dictionary.pattern_file,
        template_file: parsed.dictionary.template_file,
        training_queue_cap: parsed.training.queue_cap,
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_TOML: &str = r#"
[bot]
name = "proto"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_minimal_config_uses_defaults() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.bot_name, "proto");
        assert_eq!(cfg.dict_dir, PathBuf::from("dics"));
        assert_eq!(cfg.log_level, "warn");
        assert!(cfg.log_file.is_none());
        assert_eq!(cfg.training_queue_cap, 10_000);

        let paths = cfg.dictionary_paths();
        assert_eq!(paths.random, PathBuf::from("dics/random.txt"));
        assert_eq!(paths.pattern, PathBuf::from("dics/pattern.txt"));
        assert_eq!(paths.template, PathBuf::from("dics/template.txt"));
    }

    #[test]
    fn parse_full_config() {
        let f = write_toml(
            r#"
[bot]
name = "manachan"
dict_dir = "/var/lib/unmo"
log_level = "debug"
log_file = "/tmp/unmo.log"

[dictionary]
random_file = "r.txt"
pattern_file = "p.txt"
template_file = "t.txt"

[training]
queue_cap = 3
"#,
        );
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.bot_name, "manachan");
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/unmo.log")));
        assert_eq!(cfg.training_queue_cap, 3);
        assert_eq!(cfg.dictionary_paths().pattern, PathBuf::from("/var/lib/unmo/p.txt"));
    }

    #[test]
    fn empty_name_rejected() {
        let f = write_toml("[bot]\nname = \"  \"\n");
        let msg = load_from(f.path(), None, None).unwrap_err().to_string();
        assert!(msg.contains("bot.name"));
    }

    #[test]
    fn zero_queue_cap_rejected() {
        let f = write_toml("[bot]\nname = \"proto\"\n[training]\nqueue_cap = 0\n");
        assert!(load_from(f.path(), None, None).is_err());
    }

    #[test]
    fn unknown_log_level_rejected() {
        let f = write_toml("[bot]\nname = \"proto\"\nlog_level = \"verbose\"\n");
        let msg = load_from(f.path(), None, None).unwrap_err().to_string();
        assert!(msg.contains("bot.log_level 'verbose'"));

        let f = write_toml(MINIMAL_TOML);
        assert!(load_from(f.path(), None, Some("loud")).is_err());
        assert_eq!(load_from(f.path(), None, Some(" DEBUG ")).unwrap().log_level, "debug");
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/.unmo");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with(".unmo"));
    }

    #[test]
    fn relative_path_unchanged() {
        assert_eq!(expand_home("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), None, None);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }

    #[test]
    fn env_overrides_apply() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), Some("/tmp/unmo-dics"), Some("trace")).unwrap();
        assert_eq!(cfg.dict_dir, PathBuf::from("/tmp/unmo-dics"));
        assert_eq!(cfg.log_level, "trace");
    }
}
