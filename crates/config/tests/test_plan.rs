//! Test plan for the `chatline-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, environment overrides, and validation behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use chatline_config::{load, AppConfig, DisplayConfig, LimitsConfig, SuggestionConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "CHATLINE_CONFIG",
    "CHATLINE__DISPLAY__UTC_OFFSET_MINUTES",
    "CHATLINE__LIMITS__MAX_ATTACHMENTS",
    "CHATLINE__LIMITS__MAX_ATTACHMENT_BYTES",
    "CHATLINE__LIMITS__MAX_CONTENT_LENGTH",
    "CHATLINE__LIMITS__MAX_THREAD_DEPTH",
    "CHATLINE__SUGGESTIONS__MAX_RESULTS",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(path, contents).expect("failed to write config file");
}

fn isolated() -> (TempDir, TestContext) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());
    (temp_dir, ctx)
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let (_temp_dir, _ctx) = isolated();

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.limits, defaults.limits);
    assert_eq!(
        config.display.utc_offset_minutes,
        defaults.display.utc_offset_minutes
    );
    assert_eq!(
        config.suggestions.max_results,
        defaults.suggestions.max_results
    );
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "chatline.toml",
        r#"
        [suggestions]
        max_results = 3
        "#,
    );
    write_config_file(
        temp_dir.path(),
        "config/chatline.toml",
        r#"
        [suggestions]
        max_results = 12
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.suggestions.max_results, 3);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "config/chatline.toml",
        r#"
        [limits]
        max_thread_depth = 5

        [display]
        utc_offset_minutes = -300
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = LimitsConfig::default();

    assert_eq!(config.limits.max_thread_depth, 5);
    assert_eq!(config.limits.max_content_length, defaults.max_content_length);
    assert_eq!(config.limits.max_attachments, defaults.max_attachments);
    assert_eq!(config.display.offset().local_minus_utc(), -300 * 60);
}

#[test]
#[serial]
fn load_reads_explicit_config_path() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "elsewhere/custom.json",
        r#"{ "limits": { "max_attachments": 2 } }"#,
    );
    ctx.set_var(
        "CHATLINE_CONFIG",
        temp_dir.path().join("elsewhere/custom.json").display().to_string(),
    );

    let config = load().expect("configuration load should read CHATLINE_CONFIG");
    assert_eq!(config.limits.max_attachments, 2);
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "chatline.toml",
        r#"
        [limits]
        max_content_length = 500
        "#,
    );

    ctx.set_var("CHATLINE__LIMITS__MAX_CONTENT_LENGTH", "2000");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.limits.max_content_length, 2000);
}

#[test]
#[serial]
fn load_rejects_out_of_range_offset() {
    let (_temp_dir, mut ctx) = isolated();

    for value in ["1440", "-1440", "-2147483648"] {
        ctx.set_var("CHATLINE__DISPLAY__UTC_OFFSET_MINUTES", value);

        let error = load().expect_err("an offset of a full day or more should be rejected");
        assert!(
            format!("{error:#}").contains("utc_offset_minutes"),
            "unexpected error message for {value}: {error:#}"
        );
    }
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "chatline.toml",
        r#"
        [limits]
        max_attachments = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration") || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn display_offset_falls_back_to_utc() {
    let display = DisplayConfig {
        utc_offset_minutes: 5000,
    };
    assert_eq!(display.offset().local_minus_utc(), 0);
}

#[test]
fn suggestion_config_defaults() {
    assert_eq!(SuggestionConfig::default().max_results, 8);
}
