use crate::error::ConfigError;
use crate::notifications::BusSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::warn;

pub const CONFIG_PATH_ENV: &str = "DASHLYTICS_CONFIG";
pub const BASE_URL_ENV: &str = "DASHLYTICS_API_BASE_URL";
pub const DEFAULT_CONFIG_PATH: &str = "dashlytics.yaml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConf,
    pub notifications: NotificationsConf,
    pub views: ViewsConf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConf {
    pub base_url: String, // ex: "http://localhost:8080/api/v1"
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NotificationsConf {
    pub max_visible: usize,
    pub auto_dismiss_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ViewsConf {
    pub page_size: usize,
    pub country_revenue_limit: u32,
    pub top_products_limit: u32,
    pub top_regions_limit: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api: ApiConf::default(),
            notifications: NotificationsConf::default(),
            views: ViewsConf::default(),
        }
    }
}

impl Default for ApiConf {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".into(),
            timeout_secs: 10,
        }
    }
}

impl Default for NotificationsConf {
    fn default() -> Self {
        Self {
            max_visible: 3,
            auto_dismiss_ms: 3000,
        }
    }
}

impl Default for ViewsConf {
    fn default() -> Self {
        Self {
            page_size: 10,
            country_revenue_limit: 10,
            top_products_limit: 20,
            top_regions_limit: 30,
        }
    }
}

impl ApiConf {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl NotificationsConf {
    pub fn bus_settings(&self) -> BusSettings {
        BusSettings {
            max_visible: self.max_visible,
            auto_dismiss: Duration::from_millis(self.auto_dismiss_ms),
        }
    }
}

impl DashboardConfig {
    /// Zero sizes and limits become 1; a zero timeout falls back to the default.
    pub fn sanitized(mut self) -> Self {
        if self.api.timeout_secs == 0 {
            self.api.timeout_secs = ApiConf::default().timeout_secs;
        }
        self.notifications.max_visible = self.notifications.max_visible.max(1);
        self.views.page_size = self.views.page_size.max(1);
        self.views.country_revenue_limit = self.views.country_revenue_limit.max(1);
        self.views.top_products_limit = self.views.top_products_limit.max(1);
        self.views.top_regions_limit = self.views.top_regions_limit.max(1);
        self
    }

    /// An explicit base URL (usually from the environment) wins over the file.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.api.base_url = url;
        }
        self
    }
}

/// Reads a YAML config file. An empty file yields the defaults.
pub async fn load_config_from(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let txt = fs::read_to_string(path).await.map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if txt.trim().is_empty() {
        return Ok(DashboardConfig::default());
    }
    let cfg: DashboardConfig = serde_yaml::from_str(&txt).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cfg.sanitized())
}

/// Loads `$DASHLYTICS_CONFIG` (default `dashlytics.yaml`), falling back to
/// defaults when the file is missing or invalid, then applies
/// `$DASHLYTICS_API_BASE_URL`.
pub async fn load_config() -> DashboardConfig {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let path = Path::new(&path);

    let cfg = if path.exists() {
        load_config_from(path).await.unwrap_or_else(|e| {
            warn!("{e}, using default config");
            DashboardConfig::default()
        })
    } else {
        warn!("no {} found, using default config", path.display());
        DashboardConfig::default()
    };

    cfg.with_base_url(std::env::var(BASE_URL_ENV).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.api.base_url, "http://localhost:8080/api/v1");
        assert_eq!(cfg.notifications.max_visible, 3);
        assert_eq!(cfg.notifications.bus_settings().auto_dismiss, Duration::from_millis(3000));
        assert_eq!(cfg.views.page_size, 10);
        assert_eq!(cfg.views.top_regions_limit, 30);
    }

    #[tokio::test]
    async fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base_url: http://metrics.internal/api/v1\nviews:\n  page_size: 0").unwrap();

        let cfg = load_config_from(file.path()).await.unwrap();
        assert_eq!(cfg.api.base_url, "http://metrics.internal/api/v1");
        assert_eq!(cfg.api.timeout_secs, 10);
        assert_eq!(cfg.views.page_size, 1);
        assert_eq!(cfg.views.country_revenue_limit, 10);
    }

    #[tokio::test]
    async fn test_empty_file_is_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let cfg = load_config_from(file.path()).await.unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[tokio::test]
    async fn test_invalid_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "views: [not, a, map]").unwrap();
        let err = load_config_from(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let err = load_config_from(Path::new("/nonexistent/dashlytics.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_base_url_override() {
        let cfg = DashboardConfig::default().with_base_url(Some("http://prod:9000/api/v1".into()));
        assert_eq!(cfg.api.base_url, "http://prod:9000/api/v1");

        let cfg = DashboardConfig::default().with_base_url(Some("   ".into()));
        assert_eq!(cfg.api.base_url, "http://localhost:8080/api/v1");
    }
}
