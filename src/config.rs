//! Runtime configuration
//!
//! Read once at startup from the process environment (optionally seeded from
//! a `.env` file) and handed to the router as part of [`crate::database::AppState`].

use std::env;

use crate::error::AppError;

/// Shortest accepted admin path. Anything shorter is treated as guessable.
pub const MIN_ADMIN_PATH_LEN: usize = 64;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE: &str = "data.db";
const DEFAULT_SITE_TITLE: &str = "EdgeLink";

/// Display language for every rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Zh,
}

impl Lang {
    /// Parses a `LANG`-style value. Only Chinese is recognised explicitly;
    /// locale suffixes such as `zh_CN.UTF-8` are accepted.
    pub fn parse(value: &str) -> Self {
        if value.trim().to_ascii_lowercase().starts_with("zh") {
            Lang::Zh
        } else {
            Lang::En
        }
    }

    /// Value for the `lang` attribute of the `<html>` element
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret path segment that grants admin access. Validated per request.
    pub admin_path: Option<String>,
    pub lang: Lang,
    pub site_title: String,
    /// `None` means the language default tagline
    pub site_subtitle: Option<String>,
    pub port: u16,
    pub database_url: String,
}

impl Config {
    /// Builds the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Config {
            admin_path: get("ADMIN_PATH"),
            lang: get("LANG").map(|v| Lang::parse(&v)).unwrap_or_default(),
            site_title: get("SITE_TITLE").unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string()),
            site_subtitle: get("SITE_SUBTITLE"),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        }
    }

    /// Returns the admin path if it is long enough to be used as a credential
    pub fn admin_path(&self) -> Result<&str, AppError> {
        match self.admin_path.as_deref() {
            Some(path) if path.chars().count() >= MIN_ADMIN_PATH_LEN => Ok(path),
            _ => Err(AppError::InsecureAdminPath),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "data.db");
        assert_eq!(config.lang, Lang::En);
        assert_eq!(config.site_title, "EdgeLink");
        assert!(config.site_subtitle.is_none());
        assert!(config.admin_path.is_none());
    }

    #[test]
    fn admin_path_must_be_long_enough() {
        let short = config_from(&[("ADMIN_PATH", "admin")]);
        assert!(matches!(short.admin_path(), Err(AppError::InsecureAdminPath)));

        let missing = config_from(&[]);
        assert!(missing.admin_path().is_err());

        let boundary = "a".repeat(MIN_ADMIN_PATH_LEN - 1);
        assert!(config_from(&[("ADMIN_PATH", boundary.as_str())]).admin_path().is_err());

        let secret = "a".repeat(MIN_ADMIN_PATH_LEN);
        let config = config_from(&[("ADMIN_PATH", secret.as_str())]);
        assert_eq!(config.admin_path().unwrap(), secret);
    }

    #[test]
    fn lang_accepts_locale_suffixes() {
        assert_eq!(Lang::parse("zh"), Lang::Zh);
        assert_eq!(Lang::parse("zh_CN.UTF-8"), Lang::Zh);
        assert_eq!(Lang::parse("ZH-tw"), Lang::Zh);
        assert_eq!(Lang::parse("en_US.UTF-8"), Lang::En);
        assert_eq!(Lang::parse("fr"), Lang::En);
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = config_from(&[("PORT", "not-a-port"), ("SITE_TITLE", "Links")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.site_title, "Links");
    }
}
