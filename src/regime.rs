// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Glosten-Milgrom Market Simulator - Value Regime

use crate::config::Shock;
use crate::types::{ValueBound, ValueBounds};

/// Value regime in force at a given step: current bounds plus which bound
/// is realized. Only a scheduled [`Shock`] changes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketRegime {
    pub bounds: ValueBounds,
    pub selector: ValueBound,
    /// Selector from the config, restored by public-only shocks.
    configured_selector: ValueBound,
}

impl MarketRegime {
    pub fn new(bounds: ValueBounds, selector: ValueBound) -> Self {
        Self { bounds, selector, configured_selector: selector }
    }

    pub fn realized_value(&self) -> f64 {
        self.bounds.value_of(self.selector)
    }

    /// Apply a shock. Public bounds and the private signal are independent;
    /// a public-only shock keeps the configured selector.
    pub fn apply_shock(&mut self, shock: &Shock) {
        match (shock.private_signal, shock.public_bounds) {
            (None, None) => {}
            (Some(signal), None) => {
                self.selector = signal;
            }
            (None, Some(bounds)) => {
                self.bounds = bounds;
                self.selector = self.configured_selector;
            }
            (Some(signal), Some(bounds)) => {
                self.bounds = bounds;
                self.selector = signal;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> MarketRegime {
        MarketRegime::new(ValueBounds::new(0.0, 1.0), ValueBound::High)
    }

    #[test]
    fn test_realized_value_follows_selector() {
        assert_eq!(base().realized_value(), 1.0);
        let low = MarketRegime::new(ValueBounds::new(2.0, 5.0), ValueBound::Low);
        assert_eq!(low.realized_value(), 2.0);
    }

    #[test]
    fn test_empty_shock_is_noop() {
        let mut r = base();
        r.apply_shock(&Shock::default());
        assert_eq!(r, base());
    }

    #[test]
    fn test_private_shock_flips_selector_only() {
        let mut r = base();
        r.apply_shock(&Shock::private(ValueBound::Low));
        assert_eq!(r.bounds, ValueBounds::new(0.0, 1.0));
        assert_eq!(r.realized_value(), 0.0);
    }

    #[test]
    fn test_public_shock_moves_bounds_keeps_selector() {
        let mut r = base();
        r.apply_shock(&Shock::public(ValueBounds::new(1.0, 3.0)));
        assert_eq!(r.selector, ValueBound::High);
        assert_eq!(r.realized_value(), 3.0);
    }

    #[test]
    fn test_combined_shock_applies_both() {
        let mut r = base();
        r.apply_shock(&Shock::both(ValueBound::Low, ValueBounds::new(1.0, 3.0)));
        assert_eq!(r.bounds, ValueBounds::new(1.0, 3.0));
        assert_eq!(r.realized_value(), 1.0);
    }
}
