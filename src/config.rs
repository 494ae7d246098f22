//! Settings shared by decorators, binders and checkers.
use std::path::Path;

use serde::Deserialize;

use crate::checker::CheckOptions;
use crate::error::Result;

/// First-parameter names that mark a callable as a receiver method.
pub const DEFAULT_RECEIVER_NAMES: [&str; 4] = ["self", "cls", "mcs", "klass"];
pub const DEFAULT_LABEL_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub receiver_names: Vec<String>,
    /// Max characters of a value rendering used as a diagnostic label.
    pub label_width: usize,
    /// Emit a `warn!` event for every failed argument check.
    pub log_failures: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            receiver_names: DEFAULT_RECEIVER_NAMES.iter().map(|s| s.to_string()).collect(),
            label_width: DEFAULT_LABEL_WIDTH,
            log_failures: true,
        }
    }
}

impl Settings {
    pub fn from_json_str(src: &str) -> Result<Self> {
        crate::path_de::from_str_with_path(src)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        crate::path_de::from_file_with_path(path)
    }

    pub fn is_receiver(&self, name: &str) -> bool {
        self.receiver_names.iter().any(|r| r == name)
    }

    pub fn check_options(&self) -> CheckOptions {
        CheckOptions { label_width: self.label_width }
    }
}
