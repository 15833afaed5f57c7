//! Translation table (spec §4.5 / component C5): maps a `"v#r"`/`"v#i"`
//! token to the formatted decimal string to splice into free text.

use std::collections::BTreeMap;

use crate::complex::Complex;
use crate::config::SolverConfig;

#[derive(Clone, Debug, Default)]
pub struct TranslationTable {
    entries: BTreeMap<String, String>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` has become the constant `value`: stores both
    /// `name#r` and `name#i`.
    pub fn record(&mut self, name: &str, value: Complex, config: &SolverConfig) {
        self.entries
            .insert(format!("{name}#r"), fmt(Complex::snap(value.re), config));
        self.entries
            .insert(format!("{name}#i"), fmt(Complex::snap(value.im), config));
    }

    /// Look up a translation token (`"v#r"` or `"v#i"`, or the MetaPost
    /// spelling `"v#x"`/`"v#y"` — the scanner normalizes either spelling
    /// to `#r`/`#i` before calling this).
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }
}

/// Locale-independent fixed-point formatting; defaults to four
/// fractional digits (spec §4.5).
pub fn fmt(x: f64, config: &SolverConfig) -> String {
    format!("{:.*}", config.decimal_places, x)
}
