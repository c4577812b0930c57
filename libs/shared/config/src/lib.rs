use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub gateway_url: String,
    pub auth_url: String,
    pub session_file: String,
    pub download_dir: String,
    pub default_page_size: u32,
}

impl PortalConfig {
    pub fn from_env() -> Self {
        let gateway_url = env::var("IHMS_GATEWAY_URL").unwrap_or_else(|_| {
            warn!("IHMS_GATEWAY_URL not set, using http://localhost:8080/api");
            "http://localhost:8080/api".to_string()
        });

        let config = Self {
            auth_url: env::var("IHMS_AUTH_URL").unwrap_or_else(|_| {
                format!("{}/auth", gateway_url.trim_end_matches('/'))
            }),
            session_file: env::var("IHMS_SESSION_FILE").unwrap_or_else(|_| {
                ".ihms-session".to_string()
            }),
            download_dir: env::var("IHMS_DOWNLOAD_DIR").unwrap_or_else(|_| {
                ".".to_string()
            }),
            default_page_size: env::var("IHMS_DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    warn!("IHMS_DEFAULT_PAGE_SIZE not set or invalid, using 10");
                    10
                }),
            gateway_url,
        };

        if !config.is_configured() {
            warn!("Portal not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.gateway_url.is_empty() && !self.auth_url.is_empty()
    }
}
