// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Glosten-Milgrom Market Simulator - Model Equations

//! Closed-form pieces of the Glosten-Milgrom dealer problem.
//!
//! Every function here is pure. With `pi` and `b` strictly inside (0, 1)
//! and `theta` in [0, 1], no denominator can reach zero: each one carries a
//! `(1 - pi) * b` or `(1 - pi) * (1 - b)` term.

use crate::types::{OrderDirection, Quote, ValueBounds};

/// Dealer's expected security value under belief `theta`.
pub fn expected_value(theta: f64, bounds: ValueBounds) -> f64 {
    theta * bounds.high + (1.0 - theta) * bounds.low
}

/// Adverse-selection markup added to `mu` on the ask side.
pub fn ask_markup(theta: f64, pi: f64, b: f64, bounds: ValueBounds) -> f64 {
    let informed_mass = pi * theta * (1.0 - theta);
    informed_mass / (pi * theta + (1.0 - pi) * b) * bounds.width()
}

/// Adverse-selection discount subtracted from `mu` on the bid side.
pub fn bid_markup(theta: f64, pi: f64, b: f64, bounds: ValueBounds) -> f64 {
    let informed_mass = pi * theta * (1.0 - theta);
    informed_mass / (pi * (1.0 - theta) + (1.0 - pi) * (1.0 - b)) * bounds.width()
}

/// Full quote for one step.
pub fn quote(theta: f64, pi: f64, b: f64, bounds: ValueBounds) -> Quote {
    let mu = expected_value(theta, bounds);
    let ask = mu + ask_markup(theta, pi, b, bounds);
    let bid = mu - bid_markup(theta, pi, b, bounds);
    Quote { mu, ask, bid, spread: ask - bid }
}

/// Order an informed trader sends after seeing the realized value.
///
/// Buys when the value clears the ask, sells when it is under the bid and
/// stays out otherwise.
pub fn informed_order(realized_value: f64, quote: &Quote) -> OrderDirection {
    if realized_value > quote.ask {
        OrderDirection::Buy
    } else if realized_value < quote.bid {
        OrderDirection::Sell
    } else {
        OrderDirection::None
    }
}

/// Bayes update of the dealer belief given the observed order.
///
/// The result is not clamped; the simulator handles values outside [0, 1].
pub fn update_belief(theta: f64, pi: f64, b: f64, order: OrderDirection) -> f64 {
    match order {
        OrderDirection::Buy => (1.0 + pi) * b / (pi * theta + (1.0 - pi) * b) * theta,
        OrderDirection::Sell => (1.0 - pi) * b / (pi * (1.0 - theta) + (1.0 - pi) * b) * theta,
        OrderDirection::None => theta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn unit() -> ValueBounds {
        ValueBounds::new(0.0, 1.0)
    }

    #[test]
    fn test_expected_value_interpolates_bounds() {
        let bounds = ValueBounds::new(10.0, 20.0);
        assert_eq!(expected_value(0.0, bounds), 10.0);
        assert_eq!(expected_value(1.0, bounds), 20.0);
        assert!((expected_value(0.25, bounds) - 12.5).abs() < EPS);
    }

    #[test]
    fn test_symmetric_quote_at_even_prior() {
        let q = quote(0.5, 0.2, 0.5, unit());
        assert_eq!(q.mu, 0.5);
        assert!((q.ask - 0.6).abs() < EPS, "ask {}", q.ask);
        assert!((q.bid - 0.4).abs() < EPS, "bid {}", q.bid);
        assert!((q.spread - (q.ask - q.bid)).abs() < EPS);
    }

    #[test]
    fn test_markups_scale_with_bound_width() {
        let narrow = quote(0.3, 0.4, 0.6, unit());
        let wide = quote(0.3, 0.4, 0.6, ValueBounds::new(0.0, 4.0));
        assert!((wide.spread - 4.0 * narrow.spread).abs() < 1e-9);
    }

    #[test]
    fn test_spread_vanishes_at_certainty() {
        assert_eq!(quote(1.0, 0.2, 0.5, unit()).spread, 0.0);
        assert_eq!(quote(0.0, 0.2, 0.5, unit()).spread, 0.0);
    }

    #[test]
    fn test_spread_non_negative_inside_unit_interval() {
        for &pi in &[1e-9, 0.05, 0.5, 0.95, 1.0 - 1e-9] {
            for &b in &[0.01, 0.5, 0.99] {
                for k in 1..100 {
                    let theta = k as f64 / 100.0;
                    let q = quote(theta, pi, b, unit());
                    assert!(q.spread.is_finite(), "pi={} b={} theta={}", pi, b, theta);
                    assert!(q.spread >= 0.0, "pi={} b={} theta={}", pi, b, theta);
                }
            }
        }
    }

    #[test]
    fn test_informed_order_is_total() {
        let q = Quote { mu: 0.5, ask: 0.6, bid: 0.4, spread: 0.2 };
        assert_eq!(informed_order(1.0, &q), OrderDirection::Buy);
        assert_eq!(informed_order(0.0, &q), OrderDirection::Sell);
        assert_eq!(informed_order(0.5, &q), OrderDirection::None);
        assert_eq!(informed_order(0.6, &q), OrderDirection::None);
    }

    #[test]
    fn test_update_on_buy_and_sell() {
        let up = update_belief(0.5, 0.2, 0.5, OrderDirection::Buy);
        let down = update_belief(0.5, 0.2, 0.5, OrderDirection::Sell);
        assert!((up - 0.6).abs() < EPS, "buy posterior {}", up);
        assert!((down - 0.4).abs() < EPS, "sell posterior {}", down);
        assert_eq!(update_belief(0.37, 0.2, 0.5, OrderDirection::None), 0.37);
    }

    #[test]
    fn test_update_at_extreme_ratios_is_finite() {
        for &pi in &[1e-12, 1.0 - 1e-12] {
            for &theta in &[0.0, 0.5, 1.0] {
                assert!(update_belief(theta, pi, 0.5, OrderDirection::Buy).is_finite());
                assert!(update_belief(theta, pi, 0.5, OrderDirection::Sell).is_finite());
            }
        }
    }

    #[test]
    fn test_buy_heavy_flow_can_overshoot() {
        // (1 + pi) * b exceeds pi + (1 - pi) * b once b > 0.5
        let raw = update_belief(0.99, 0.5, 0.9, OrderDirection::Buy);
        assert!(raw > 1.0, "expected overshoot, got {}", raw);
    }
}
