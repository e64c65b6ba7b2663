//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `DOKAN_DOWNLOAD_DIR` - Where exports are saved (default: current directory)
//! - `DOKAN_COMMENTS_PAGE_SIZE` - Comments per page (default: 10)
//! - `DOKAN_COMMENT_FILTERING` - `client` to re-filter fetched pages locally,
//!   `server` to trust the server's filtering (default: `client`)
//!
//! The API base URL and timeout come from the storefront configuration.

use std::path::PathBuf;

use dokan_storefront::config::ConfigError;

const DEFAULT_DOWNLOAD_DIR: &str = ".";
const DEFAULT_COMMENTS_PAGE_SIZE: u32 = 10;

/// Who filters, sorts and paginates the comment moderation queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// The server filters the fetched page and the service applies the same
    /// filters again locally, so a server that ignores a parameter still
    /// yields the expected view.
    #[default]
    ServerAndClient,
    /// The fetched page is authoritative and shown as returned.
    ServerOnly,
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" | "server-and-client" => Ok(Self::ServerAndClient),
            "server" | "server-only" => Ok(Self::ServerOnly),
            _ => Err(format!("expected 'client' or 'server', got '{s}'")),
        }
    }
}

/// Admin back-office configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Directory receiving CSV/PDF exports.
    pub download_dir: PathBuf,
    /// Default `limit` for comment queries.
    pub comments_page_size: u32,
    pub filter_mode: FilterMode,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            comments_page_size: DEFAULT_COMMENTS_PAGE_SIZE,
            filter_mode: FilterMode::default(),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let download_dir = std::env::var("DOKAN_DOWNLOAD_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR), PathBuf::from);

        let comments_page_size = match std::env::var("DOKAN_COMMENTS_PAGE_SIZE") {
            Ok(raw) => parse_page_size(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("DOKAN_COMMENTS_PAGE_SIZE".to_string(), e)
            })?,
            Err(_) => DEFAULT_COMMENTS_PAGE_SIZE,
        };

        let filter_mode = match std::env::var("DOKAN_COMMENT_FILTERING") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("DOKAN_COMMENT_FILTERING".to_string(), e))?,
            Err(_) => FilterMode::default(),
        };

        Ok(Self {
            download_dir,
            comments_page_size,
            filter_mode,
        })
    }
}

fn parse_page_size(raw: &str) -> Result<u32, String> {
    let size = raw.trim().parse::<u32>().map_err(|e| e.to_string())?;
    if size == 0 {
        return Err("page size must be at least 1".to_string());
    }
    Ok(size)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size(" 25 ").unwrap(), 25);
        assert!(parse_page_size("0").is_err());
        assert!(parse_page_size("ten").is_err());
    }

    #[test]
    fn test_filter_mode_from_str() {
        assert_eq!("server".parse::<FilterMode>().unwrap(), FilterMode::ServerOnly);
        assert_eq!(
            "Client".parse::<FilterMode>().unwrap(),
            FilterMode::ServerAndClient
        );
        assert!("both".parse::<FilterMode>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert_eq!(config.comments_page_size, 10);
        assert_eq!(config.filter_mode, FilterMode::ServerAndClient);
    }
}
