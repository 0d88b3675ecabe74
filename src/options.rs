/// Date format used to parse textual dates when no other is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Settings for one deserialization call.
///
/// Options travel with each call instead of living in a global, so concurrent calls may use
/// different settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VPackOptions {
    date_format: String,
}

impl VPackOptions {
    pub fn new() -> VPackOptions { VPackOptions::default() }

    /// Sets the `chrono` format string used for dates stored as text.
    pub fn with_date_format<S: Into<String>>(mut self, format: S) -> VPackOptions {
        self.date_format = format.into();
        self
    }

    pub fn date_format(&self) -> &str { &self.date_format }
}

impl Default for VPackOptions {
    fn default() -> VPackOptions {
        VPackOptions {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}
