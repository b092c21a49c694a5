//! Java properties files for the managed services

use std::path::Path;

use tokio::fs;

use crate::error::EnvironmentResult;

/// Ordered key/value pairs rendered as a `.properties` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, replacing an earlier value in place
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{key}={}\n", escape(value)))
            .collect()
    }

    pub async fn write_to(&self, path: &Path) -> EnvironmentResult<()> {
        fs::write(path, self.render()).await?;
        Ok(())
    }
}

// Backslashes are the only character the services' values need escaped.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\")
}
