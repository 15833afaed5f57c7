//! Run-time configuration for the solver (spec §9: the hard-coded
//! tolerance and decimal format "should be adjustable but preserve the
//! default so golden tests match").

/// Decimal places used by `translate::fmt` (spec §4.5). The reference
/// format is four fractional digits; kept as the default.
pub const DEFAULT_DECIMAL_PLACES: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    pub decimal_places: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}
