//! Configuration access port trait.

/// Lookups of `[section] key` values. Numeric keys are read as strings and
/// parsed by the caller so malformed values can be reported.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// Falls back to `default` when the key is absent or not a boolean.
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    fn get_string_or(&self, section: &str, key: &str, default: &str) -> String {
        self.get_string(section, key)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}
