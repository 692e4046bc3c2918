//! The identity this instance reports: machine name plus operator text.

use tracing::warn;

/// Hostname and free-form text, resolved once at startup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Host {
    name: String,
    text: String,
}

impl Host {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }

    /// Reads the machine name from the operating system. An unreadable name
    /// is logged and reported as an empty string.
    pub fn detect(text: impl Into<String>) -> Self {
        let name = match hostname::get() {
            Ok(name) => name.to_string_lossy().into_owned(),
            Err(e) => {
                warn!(error = %e, "could not read hostname");
                String::new()
            }
        };
        Self::new(name, text)
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn text(&self) -> &str { &self.text }

    /// `"{name}\n{text}"`.
    pub fn banner(&self) -> String {
        format!("{}\n{}", self.name, self.text)
    }
}
