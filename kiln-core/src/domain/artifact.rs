//! Exported artifact formats

use serde::{Deserialize, Serialize};

/// File format a completed job can be downloaded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Fbx,
    Obj,
}

impl ExportFormat {
    /// Value of the `format` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Fbx => "fbx",
            ExportFormat::Obj => "obj",
        }
    }

    /// File extension for a downloaded artifact
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fbx" => Ok(ExportFormat::Fbx),
            "obj" => Ok(ExportFormat::Obj),
            other => Err(format!("unsupported export format '{}' (expected fbx or obj)", other)),
        }
    }
}
