//! Shared environment of a layer
//!
//! Each entry is stored under `NAME.<operation>`, matching the file layout
//! in `<layer>/env/` that later pipeline stages read.

use std::collections::BTreeMap;

/// Environment modifications a layer exports to later stages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment(BTreeMap<String, String>);

impl Environment {
    /// Set `name` only if nothing else has set it
    pub fn default_value(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(format!("{}.default", name), value.into());
    }

    /// Replace `name` unconditionally
    pub fn override_value(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(format!("{}.override", name), value.into());
    }

    /// Prepend `value` to the list in `name`, separated by `delim`
    pub fn prepend(&mut self, name: &str, value: impl Into<String>, delim: &str) {
        self.0.insert(format!("{}.prepend", name), value.into());
        self.0.insert(format!("{}.delim", name), delim.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw `(file name, content)` entries
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up a raw entry such as `PYTHONPATH.prepend`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Human-readable `(name, effective value)` pairs
    pub fn describe(&self) -> Vec<(String, String)> {
        let mut described = Vec::new();
        for (key, value) in &self.0 {
            let Some((name, op)) = key.rsplit_once('.') else {
                continue;
            };
            let delim = self
                .0
                .get(&format!("{}.delim", name))
                .map(String::as_str)
                .unwrap_or_default();
            let shown = match op {
                "prepend" => format!("{}{}${}", value, delim, name),
                "append" => format!("${}{}{}", name, delim, value),
                "default" | "override" => value.clone(),
                _ => continue,
            };
            described.push((name.to_string(), shown));
        }
        described
    }
}

/// Platform path-list separator
pub fn path_list_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}
