use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub counter: CounterConfig,
}

/// Limits applied by every mounted instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Maximum transitions applied by a single dispatch, including messages
    /// sent by its effects and subscriptions (default: 10000).
    #[serde(default = "default_max_transitions_per_dispatch")]
    pub max_transitions_per_dispatch: usize,
}

/// Settings for the terminal counter demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Document clicks are listened to while the count is below this value
    /// (default: 30).
    #[serde(default = "default_click_limit")]
    pub click_limit: i64,
    /// Amount added per document click (default: 5).
    #[serde(default = "default_click_step")]
    pub click_step: i64,
    /// Input poll interval in milliseconds (default: 250).
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_max_transitions_per_dispatch() -> usize {
    10_000
}

fn default_click_limit() -> i64 {
    30
}

fn default_click_step() -> i64 {
    5
}

fn default_tick_ms() -> u64 {
    250
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_transitions_per_dispatch: default_max_transitions_per_dispatch(),
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            click_limit: default_click_limit(),
            click_step: default_click_step(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            counter: CounterConfig::default(),
        }
    }
}
