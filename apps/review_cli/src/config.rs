use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "review_cli.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".into(),
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    log_filter: Option<String>,
}

/// Defaults, then `review_cli.toml`, then environment, then the CLI flag.
pub fn load_settings(api_url_override: Option<&str>) -> Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), api_url_override)
}

fn load_settings_from(path: &Path, api_url_override: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(file_cfg) = read_file_settings(path)? {
        if let Some(v) = file_cfg.api_url {
            settings.api_url = v;
        }
        if let Some(v) = file_cfg.log_filter {
            settings.log_filter = v;
        }
    }

    if let Ok(v) = std::env::var("SENTIMENT_API_URL") {
        settings.api_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_URL") {
        settings.api_url = v;
    }
    if let Ok(v) = std::env::var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = api_url_override {
        settings.api_url = v.to_string();
    }

    settings.api_url = validate_api_url(&settings.api_url)?;
    Ok(settings)
}

fn read_file_settings(path: &Path) -> Result<Option<FileSettings>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    let parsed = toml::from_str::<FileSettings>(&raw)
        .with_context(|| format!("invalid settings file '{}'", path.display()))?;
    Ok(Some(parsed))
}

fn validate_api_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed =
        Url::parse(trimmed).with_context(|| format!("invalid api url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("api url '{trimmed}' must use http or https");
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn validate_api_url_strips_trailing_slash() {
        assert_eq!(
            validate_api_url(" https://reviews.example.com/ ").expect("valid"),
            "https://reviews.example.com"
        );
    }

    #[test]
    fn validate_api_url_rejects_other_schemes() {
        let err = validate_api_url("ftp://reviews.example.com").expect_err("ftp");
        assert!(err.to_string().contains("must use http or https"));
        assert!(validate_api_url("not a url").is_err());
    }

    #[test]
    fn reads_settings_file_when_present() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("review_cli_settings_{suffix}.toml"));
        fs::write(
            &path,
            "api_url = \"http://10.0.0.5:9000\"\nlog_filter = \"debug\"\n",
        )
        .expect("write");

        let parsed = read_file_settings(&path).expect("read").expect("present");
        assert_eq!(parsed.api_url.as_deref(), Some("http://10.0.0.5:9000"));
        assert_eq!(parsed.log_filter.as_deref(), Some("debug"));

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn later_sources_override_earlier_ones() {
        for var in ["SENTIMENT_API_URL", "APP__API_URL", "APP__LOG_FILTER"] {
            env::remove_var(var);
        }
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("review_cli_precedence_{suffix}.toml"));
        fs::write(
            &path,
            "api_url = \"http://file.example:8000/\"\nlog_filter = \"warn\"\n",
        )
        .expect("write");

        let settings = load_settings_from(&path, None).expect("file only");
        assert_eq!(settings.api_url, "http://file.example:8000");
        assert_eq!(settings.log_filter, "warn");

        env::set_var("SENTIMENT_API_URL", "http://legacy-env.example:8000");
        let settings = load_settings_from(&path, None).expect("legacy env");
        assert_eq!(settings.api_url, "http://legacy-env.example:8000");

        env::set_var("APP__API_URL", "http://app-env.example:8000");
        env::set_var("APP__LOG_FILTER", "debug");
        let settings = load_settings_from(&path, None).expect("app env");
        assert_eq!(settings.api_url, "http://app-env.example:8000");
        assert_eq!(settings.log_filter, "debug");

        let settings =
            load_settings_from(&path, Some("https://flag.example")).expect("flag");
        assert_eq!(settings.api_url, "https://flag.example");

        for var in ["SENTIMENT_API_URL", "APP__API_URL", "APP__LOG_FILTER"] {
            env::remove_var(var);
        }
        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn missing_settings_file_is_not_an_error() {
        let parsed = read_file_settings(Path::new("definitely/not/here.toml")).expect("read");
        assert!(parsed.is_none());
    }
}
