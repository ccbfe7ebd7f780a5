use std::path::PathBuf;

pub const DEFAULT_SNAPSHOT_FILE: &str = "cache/games_snapshot.json";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_OFFERS_API_URL: &str = "http://127.0.0.1:3000";

/// Settings read from the environment (and `.env`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub snapshot_file: PathBuf,
    pub bind_addr: String,
    pub offers_api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot_file: PathBuf::from(DEFAULT_SNAPSHOT_FILE),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            offers_api_url: DEFAULT_OFFERS_API_URL.to_string(),
        }
    }
}

impl Settings {
    /// Load `.env` if present, then read SNAPSHOT_FILE, BIND_ADDR and OFFERS_API_URL
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            snapshot_file: non_empty("SNAPSHOT_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_file),
            bind_addr: non_empty("BIND_ADDR").unwrap_or(defaults.bind_addr),
            offers_api_url: non_empty("OFFERS_API_URL").unwrap_or(defaults.offers_api_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Settings::from_lookup(|_| None), Settings::default());
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let env: HashMap<&str, &str> = [
            ("SNAPSHOT_FILE", "/tmp/games.json"),
            ("BIND_ADDR", "  "),
            ("OFFERS_API_URL", "http://offers.local:8080"),
        ]
        .into_iter()
        .collect();

        let settings = Settings::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.snapshot_file, PathBuf::from("/tmp/games.json"));
        assert_eq!(settings.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(settings.offers_api_url, "http://offers.local:8080");
    }
}
