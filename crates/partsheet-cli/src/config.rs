// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use partsheet_sheets::{DEFAULT_API_BASE_URL, SheetsOptions};
use serde::Deserialize;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "partsheet";
const CONFIG_VERSION: i64 = 1;
const CONFIG_PATH_ENV: &str = "PARTSHEET_CONFIG_PATH";
const ACCESS_TOKEN_ENV: &str = "PARTSHEET_ACCESS_TOKEN";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LISTEN: &str = "127.0.0.1:8501";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub sheet: Sheet,
    #[serde(default)]
    pub server: Server,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            sheet: Sheet::default(),
            server: Server::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sheet {
    pub url: Option<String>,
    pub worksheet: Option<String>,
    pub api_base_url: Option<String>,
    pub access_token: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub listen: Option<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            listen: Some(DEFAULT_LISTEN.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [sheet] and [server]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Regenerate it with --print-example-config",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(timeout) = &self.sheet.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed.is_zero() {
                bail!(
                    "sheet.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(base_url) = &self.sheet.api_base_url
            && base_url.trim().is_empty()
        {
            bail!(
                "sheet.api_base_url in {} is empty -- remove it to use {}",
                path.display(),
                DEFAULT_API_BASE_URL
            );
        }

        self.listen_addr()
            .with_context(|| format!("invalid [server] section in {}", path.display()))?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let raw = self.server.listen.as_deref().unwrap_or(DEFAULT_LISTEN);
        parse_listen(raw)
    }

    pub fn api_base_url(&self) -> &str {
        self.sheet
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn sheet_timeout(&self) -> Result<Duration> {
        parse_duration(self.sheet.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    /// Config value first, then the environment.
    pub fn access_token(&self) -> Option<String> {
        non_blank(self.sheet.access_token.clone())
            .or_else(|| non_blank(env::var(ACCESS_TOKEN_ENV).ok()))
    }

    pub fn sheets_options(&self) -> Result<SheetsOptions> {
        let location = non_blank(self.sheet.url.clone()).ok_or_else(|| {
            anyhow!(
                "[sheet].url is not set -- add the spreadsheet link to the config, or run with --demo"
            )
        })?;
        Ok(SheetsOptions {
            location,
            worksheet: non_blank(self.sheet.worksheet.clone()),
            api_base_url: self.api_base_url().to_owned(),
            access_token: self.access_token(),
            api_key: non_blank(self.sheet.api_key.clone()),
            timeout: self.sheet_timeout()?,
        })
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# partsheet config\n# Place this file at: {}\n\nversion = 1\n\n[sheet]\n# Link to the spreadsheet (or its bare id). It must be shared with editor access.\nurl = \"https://docs.google.com/spreadsheets/d/<id>/edit\"\n# Optional. Defaults to the first worksheet.\n# worksheet = \"Inventory\"\napi_base_url = \"{}\"\n# OAuth bearer token; {} is used when this is unset.\n# access_token = \"\"\n# api_key = \"\"\ntimeout = \"{}\"\n\n[server]\nlisten = \"{}\"\n",
            path.display(),
            DEFAULT_API_BASE_URL,
            ACCESS_TOKEN_ENV,
            DEFAULT_TIMEOUT,
            DEFAULT_LISTEN,
        )
    }
}

pub fn parse_listen(raw: &str) -> Result<SocketAddr> {
    raw.trim().parse::<SocketAddr>().map_err(|error| {
        anyhow!(
            "invalid listen address {raw:?} -- use host:port, for example {DEFAULT_LISTEN} ({error})"
        )
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration, parse_listen};
    use anyhow::Result;
    use partsheet_testkit::temp_config_path;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let (temp, path) = temp_config_path()?;
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let (_temp, path) = temp_config_path()?;
        let config = Config::load(&path)?;
        assert_eq!(config.version, 1);
        assert_eq!(config.listen_addr()?.to_string(), "127.0.0.1:8501");
        assert_eq!(config.api_base_url(), "https://sheets.googleapis.com");
        assert_eq!(config.sheet_timeout()?, Duration::from_secs(10));
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[sheet]\nurl = \"abc\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[sheet] and [server]"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn v1_config_builds_sheet_options() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[sheet]\nurl = \"https://docs.google.com/spreadsheets/d/abc123/edit\"\nworksheet = \"Stock\"\napi_base_url = \"http://localhost:9000///\"\naccess_token = \"tok\"\ntimeout = \"2s\"\n[server]\nlisten = \"0.0.0.0:9090\"\n",
        )?;

        let config = Config::load(&path)?;
        let options = config.sheets_options()?;
        assert_eq!(options.worksheet.as_deref(), Some("Stock"));
        assert_eq!(options.api_base_url, "http://localhost:9000");
        assert_eq!(options.access_token.as_deref(), Some("tok"));
        assert_eq!(options.timeout, Duration::from_secs(2));
        assert_eq!(config.listen_addr()?.port(), 9090);
        Ok(())
    }

    #[test]
    fn sheet_url_is_required_for_remote_mode() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[sheet]\nurl = \"  \"\n")?;
        let config = Config::load(&path)?;
        let error = config
            .sheets_options()
            .expect_err("blank url should fail");
        assert!(error.to_string().contains("--demo"));
        Ok(())
    }

    #[test]
    fn access_token_falls_back_to_environment() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n[sheet]\nurl = \"abc123\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("PARTSHEET_ACCESS_TOKEN", "from-env");
        }
        let config = Config::load(&path)?;
        let token = config.access_token();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("PARTSHEET_ACCESS_TOKEN");
        }
        assert_eq!(token.as_deref(), Some("from-env"));
        Ok(())
    }

    #[test]
    fn access_token_prefers_config_over_environment() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[sheet]\nurl = \"abc123\"\naccess_token = \"from-file\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("PARTSHEET_ACCESS_TOKEN", "from-env");
        }
        let config = Config::load(&path)?;
        let token = config.access_token();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("PARTSHEET_ACCESS_TOKEN");
        }
        assert_eq!(token.as_deref(), Some("from-file"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let (_temp, override_path) = temp_config_path()?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("PARTSHEET_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("PARTSHEET_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("PARTSHEET_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("partsheet/config.toml"));
        Ok(())
    }

    #[test]
    fn timeout_parses_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn timeout_rejects_invalid_and_zero_values() -> Result<()> {
        let error = parse_duration("soon").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid"));

        let (_temp, path) = write_config("version = 1\n[sheet]\ntimeout = \"0ms\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn listen_address_is_validated() -> Result<()> {
        assert!(parse_listen("localhost").is_err());
        let (_temp, path) = write_config("version = 1\n[server]\nlisten = \"nope\"\n")?;
        let error = Config::load(&path).expect_err("bad listen should fail");
        assert!(format!("{error:#}").contains("invalid listen address"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_loader() -> Result<()> {
        let (_temp, path) = temp_config_path()?;
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[sheet]"));
        assert!(example.contains("[server]"));

        std::fs::write(&path, &example)?;
        let config = Config::load(&path)?;
        assert!(config.sheet.url.is_some());
        Ok(())
    }
}
