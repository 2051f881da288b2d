#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Delay before a debounced search runs, in milliseconds
    pub search_debounce_ms: u64,

    // Simulated network latency of the mock backends, in milliseconds
    pub network_delay_ms: u64,
}

impl Config {
    pub fn search_debounce(&self) -> time::Duration {
        storefront_async::time::from_millis(self.search_debounce_ms)
    }

    pub fn network_delay(&self) -> time::Duration {
        storefront_async::time::from_millis(self.network_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            network_delay_ms: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search_debounce(), time::Duration::milliseconds(300));
        assert_eq!(config.network_delay(), time::Duration::milliseconds(300));
    }

    #[test]
    fn test_debug_lists_fields() {
        let config = Config {
            search_debounce_ms: 50,
            ..Default::default()
        };
        let text = format!("{config:?}");
        assert!(text.contains("search_debounce_ms: 50"));
    }
}
