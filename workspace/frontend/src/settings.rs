use log::Level;
use web_sys::window;

/// Global application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Backend origin, e.g. "http://localhost:3000". `None` talks to the
    /// origin the page was served from, which keeps the session cookie flowing.
    pub api_origin: Option<String>,

    /// API path prefix (e.g., "/api/v1")
    pub api_path: String,

    /// Default log level for the application
    pub log_level: Level,

    /// Enable debug mode
    pub debug_mode: bool,

    /// Toast notification duration in milliseconds
    pub toast_duration_ms: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_origin: None,
            api_path: "/api/v1".to_string(),
            log_level: Level::Info,
            debug_mode: false,
            toast_duration_ms: 5000,
        }
    }
}

fn parse_level(value: &str) -> Option<Level> {
    match value.to_lowercase().as_str() {
        "error" => Some(Level::Error),
        "warn" => Some(Level::Warn),
        "info" => Some(Level::Info),
        "debug" => Some(Level::Debug),
        "trace" => Some(Level::Trace),
        _ => None,
    }
}

impl AppSettings {
    /// Create settings from window location and localStorage overrides
    pub fn from_environment() -> Self {
        let mut settings = Self::default();

        let Some(window) = window() else {
            return settings;
        };

        if let Ok(hostname) = window.location().hostname() {
            settings.debug_mode = hostname == "localhost" || hostname == "127.0.0.1";
            if settings.debug_mode {
                settings.log_level = Level::Debug;
            }
        }

        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(origin)) = storage.get_item("pairhub_api_origin") {
                let origin = origin.trim().trim_end_matches('/').to_string();
                settings.api_origin = (!origin.is_empty()).then_some(origin);
            }

            if let Ok(Some(level)) = storage.get_item("pairhub_log_level") {
                settings.log_level = parse_level(&level).unwrap_or(settings.log_level);
            }
        }

        settings
    }

    /// Get the base API URL, relative when no origin is configured
    pub fn api_base_url(&self) -> String {
        match &self.api_origin {
            Some(origin) => format!("{}{}", origin, self.api_path),
            None => self.api_path.clone(),
        }
    }

    /// Get the full API URL for an endpoint
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base_url(), endpoint)
    }
}

// Global settings instance using thread_local
use std::cell::RefCell;

thread_local! {
    static SETTINGS: RefCell<AppSettings> = RefCell::new(AppSettings::default());
}

/// Get a copy of the current settings
pub fn get_settings() -> AppSettings {
    SETTINGS.with(|s| s.borrow().clone())
}

/// Initialize settings (call this at app startup)
pub fn init_settings() {
    SETTINGS.with(|s| {
        *s.borrow_mut() = AppSettings::from_environment();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_urls_are_relative_by_default() {
        let settings = AppSettings::default();
        assert_eq!(settings.api_url("/me"), "/api/v1/me");
    }

    #[test]
    fn api_origin_is_prefixed() {
        let settings = AppSettings {
            api_origin: Some("http://localhost:3000".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.api_url("/posts"), "http://localhost:3000/api/v1/posts");
    }

    #[test]
    fn log_levels_parse_case_insensitively() {
        assert_eq!(parse_level("TRACE"), Some(Level::Trace));
        assert_eq!(parse_level("warn"), Some(Level::Warn));
        assert_eq!(parse_level("loud"), None);
    }
}
