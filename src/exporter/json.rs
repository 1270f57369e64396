// file: src/exporter/json.rs
// description: json export of summaries and search results

use crate::error::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportEnvelope<'a, T: Serialize> {
    pub exported_at: String,
    pub kind: &'a str,
    pub data: &'a T,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Writes `value` wrapped in a timestamped envelope and returns the file path.
    pub fn export<T: Serialize>(&self, kind: &str, value: &T, pretty: bool) -> Result<PathBuf> {
        let now = Utc::now();
        let envelope = ExportEnvelope {
            exported_at: now.to_rfc3339(),
            kind,
            data: value,
        };

        let body = if pretty {
            serde_json::to_string_pretty(&envelope)?
        } else {
            serde_json::to_string(&envelope)?
        };

        let file_name = format!(
            "{}_{}.json",
            sanitize(kind),
            now.format("%Y%m%dT%H%M%S%3f")
        );
        let path = self.output_dir.join(file_name);
        fs::write(&path, body)?;

        info!("Exported {} to {}", kind, path.display());
        Ok(path)
    }
}

fn sanitize(kind: &str) -> String {
    kind.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
