// Sat Oct 17 2026 - Alex

use serde::{Deserialize, Serialize};

/// Which regular-expression backend compiles and runs the patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// `regex::bytes`: linear time, searches arbitrary bytes, no look-around.
    Standard,
    /// `fancy_regex`: look-around and back-references, UTF-8 haystacks only.
    Backtracking,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub engine: EngineKind,
    pub backtrack_limit: usize,
    pub size_limit: usize,
    pub log_level: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Backtracking,
            backtrack_limit: 1_000_000,
            size_limit: 10 * (1 << 20),
            log_level: "warn".to_string(),
        }
    }
}

impl ScannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_backtrack_limit(mut self, limit: usize) -> Self {
        self.backtrack_limit = limit;
        self
    }

    pub fn with_size_limit(mut self, limit: usize) -> Self {
        self.size_limit = limit;
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.backtrack_limit == 0 {
            return Err("backtrack_limit must be greater than 0".to_string());
        }
        if self.size_limit == 0 {
            return Err("size_limit must be greater than 0".to_string());
        }
        Ok(())
    }
}
