use std::path::PathBuf;

/// Port the panel interface listens on; game clients connect one above it.
pub const DEFAULT_PORT: u16 = 4326;

/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base port: panel page and panel channel.
    pub port: u16,
    /// Server bind host.
    pub host: String,
    /// Directory the panel page and its assets are served from.
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any variable source, falling back to
    /// defaults for missing or unusable values.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        AppConfig {
            port: var("PORT")
                .and_then(|v| v.parse().ok())
                // The client port is PORT + 1, so the top port is unusable.
                .filter(|p: &u16| *p < u16::MAX)
                .unwrap_or(DEFAULT_PORT),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
        }
    }

    /// Port game clients connect to.
    pub fn client_port(&self) -> u16 {
        self.port.saturating_add(1)
    }

    /// Socket address string for the panel listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Socket address string for the game client listener.
    pub fn client_bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.client_port())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 4326);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.bind_addr(), "0.0.0.0:4326");
        assert_eq!(config.client_bind_addr(), "0.0.0.0:4327");
    }

    #[test]
    fn client_port_is_base_plus_one() {
        let config = AppConfig {
            port: 9000,
            ..AppConfig::default()
        };
        assert_eq!(config.client_port(), 9001);
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn lookup_defaults() {
        let config = AppConfig::from_lookup(vars(&[]));
        assert_eq!(config.port, 4326);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn lookup_overrides() {
        let config = AppConfig::from_lookup(vars(&[
            ("PORT", "5000"),
            ("HOST", "127.0.0.1"),
            ("STATIC_DIR", "/srv/panel"),
        ]));
        assert_eq!(config.port, 5000);
        assert_eq!(config.client_port(), 5001);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.static_dir, PathBuf::from("/srv/panel"));
        assert_eq!(config.client_bind_addr(), "127.0.0.1:5001");
    }

    #[test]
    fn top_port_falls_back_to_default() {
        let config = AppConfig::from_lookup(vars(&[("PORT", "65535")]));
        assert_eq!(config.port, 4326);
    }

    #[test]
    fn unparsable_port_falls_back_to_default() {
        let config = AppConfig::from_lookup(vars(&[("PORT", "liftoff")]));
        assert_eq!(config.port, 4326);
        let config = AppConfig::from_lookup(vars(&[("PORT", "70000")]));
        assert_eq!(config.port, 4326);
    }
}
