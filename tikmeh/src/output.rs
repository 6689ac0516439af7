use std::path::Path;

use serde::Serialize;

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct JsonOutput {
    pub files: Vec<String>,
    pub error: String
}

/// Collects what a command produced and reports it either as log lines as it
/// happens or as one JSON document at the end.
#[derive(Debug)]
pub struct Output {
    json: bool,
    report: JsonOutput
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            report: JsonOutput::default()
        }
    }

    pub fn file(&mut self, path: &Path) {
        tracing::info!("downloaded {}", path.display());
        self.report.files.push(path.display().to_string());
    }

    /// Records an error. The JSON report keeps the first one.
    pub fn error(&mut self, message: String) {
        tracing::error!("{}", message);
        if self.report.error.is_empty() {
            self.report.error = message;
        }
    }

    pub fn warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    pub fn finish(self) -> serde_json::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&self.report)?);
        }
        Ok(())
    }
}
