use std::env;
use std::time::Duration;

use layers::LayerId;
use serde::Serialize;

/// Service endpoints and query defaults, read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerConfig {
    pub wfs_url: String,
    pub wms_url: String,
    pub geocoder_url: String,
    /// WFS type queried by polygon and point selections.
    pub selection_type_name: String,
    #[serde(skip)]
    pub request_timeout: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            wfs_url: "http://localhost:8080/geoserver/mme/wfs".to_string(),
            wms_url: "http://localhost:8080/geoserver/mme/wms".to_string(),
            geocoder_url: "https://nominatim.openstreetmap.org/search".to_string(),
            selection_type_name: LayerId::Geology.type_name().to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            wfs_url: env_var_string("GEOSERVER_WFS_URL", &defaults.wfs_url),
            wms_url: env_var_string("GEOSERVER_WMS_URL", &defaults.wms_url),
            geocoder_url: env_var_string("GEOCODER_URL", &defaults.geocoder_url),
            selection_type_name: env_var_string(
                "SELECTION_TYPE_NAME",
                &defaults.selection_type_name,
            ),
            request_timeout: Duration::from_secs(env_var_u64(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
        }
    }
}

pub fn env_var_string(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
