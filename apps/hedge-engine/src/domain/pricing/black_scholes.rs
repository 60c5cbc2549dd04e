//! Black-Scholes-Merton Pricing
//!
//! Closed-form price, delta, gamma, theta and vega for European options.
//!
//! Assumptions:
//! - European exercise, continuous compounding, zero dividend yield
//! - Actual/365 day count for time to expiry
//! - Theta is reported per calendar day, vega per 1 vol point
//!
//! The engine never substitutes a missing volatility. Callers that want a
//! fallback go through [`super::VolatilityPolicy`] first.

// Black-Scholes uses standard mathematical notation (s, k, t, r, sigma)
// Financial formulas use standard notation where mul_add() obscures meaning
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use std::f64::consts::PI;

use chrono::NaiveDate;

use super::{GreeksResult, PricingError};
use crate::domain::option_position::{OptionLeg, OptionRight};

/// Days per year for the Actual/365 convention.
pub const DAYS_PER_YEAR: f64 = 365.0;

// ============================================================================
// Helpers
// ============================================================================

/// Standard normal CDF.
pub(crate) fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
}

/// Standard normal PDF.
pub(crate) fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

fn d1(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> f64 {
    ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

/// Parse an expiry in `YYYY-MM-DD` form.
pub fn parse_expiry(value: &str) -> Result<NaiveDate, PricingError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        PricingError::InvalidExpiry {
            value: value.to_string(),
        }
    })
}

/// Year fraction between two dates (Actual/365). Negative once expired.
#[must_use]
pub fn year_fraction(evaluation_date: NaiveDate, expiry: NaiveDate) -> f64 {
    (expiry - evaluation_date).num_days() as f64 / DAYS_PER_YEAR
}

// ============================================================================
// Pricing
// ============================================================================

/// Price and Greeks for one unit of a European option.
///
/// When `t_years <= 0` the expiry boundary applies: price is intrinsic,
/// delta is 1/0 (call) or -1/0 (put) by moneyness and +/-0.5 exactly at the
/// money, and gamma, theta and vega are zero.
pub fn price_option(
    spot: f64,
    strike: f64,
    t_years: f64,
    rate: f64,
    sigma: f64,
    right: OptionRight,
) -> Result<GreeksResult, PricingError> {
    validate_inputs(spot, strike, t_years, rate)?;
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PricingError::InvalidVolatility { sigma });
    }

    if t_years <= 0.0 {
        return Ok(expiry_boundary(spot, strike, right));
    }

    let sqrt_t = t_years.sqrt();
    let d1_val = d1(spot, strike, t_years, rate, sigma);
    let d2_val = d1_val - sigma * sqrt_t;
    let discount = (-rate * t_years).exp();
    let pdf_d1 = norm_pdf(d1_val);

    let gamma = pdf_d1 / (spot * sigma * sqrt_t);
    let vega = spot * pdf_d1 * sqrt_t / 100.0;
    let decay = -spot * pdf_d1 * sigma / (2.0 * sqrt_t);

    let (price, delta, annual_theta) = match right {
        OptionRight::Call => (
            spot * norm_cdf(d1_val) - strike * discount * norm_cdf(d2_val),
            norm_cdf(d1_val),
            decay - rate * strike * discount * norm_cdf(d2_val),
        ),
        OptionRight::Put => (
            strike * discount * norm_cdf(-d2_val) - spot * norm_cdf(-d1_val),
            norm_cdf(d1_val) - 1.0,
            decay + rate * strike * discount * norm_cdf(-d2_val),
        ),
    };

    Ok(GreeksResult {
        price,
        delta,
        gamma,
        theta: annual_theta / DAYS_PER_YEAR,
        vega,
    })
}

/// Price an option given its expiry string and the evaluation date.
pub fn price_option_at(
    spot: f64,
    strike: f64,
    expiry: &str,
    evaluation_date: NaiveDate,
    rate: f64,
    sigma: f64,
    right: OptionRight,
) -> Result<GreeksResult, PricingError> {
    let expiry = parse_expiry(expiry)?;
    price_option(
        spot,
        strike,
        year_fraction(evaluation_date, expiry),
        rate,
        sigma,
        right,
    )
}

/// Price a position leg at `spot` using the leg's own volatility and rate.
pub fn price_leg(
    leg: &OptionLeg,
    spot: f64,
    evaluation_date: NaiveDate,
    sigma: f64,
) -> Result<GreeksResult, PricingError> {
    price_option(
        spot,
        leg.strike(),
        year_fraction(evaluation_date, leg.expiry()),
        leg.risk_free_rate(),
        sigma,
        leg.right(),
    )
}

fn validate_inputs(spot: f64, strike: f64, t_years: f64, rate: f64) -> Result<(), PricingError> {
    if !spot.is_finite() || spot <= 0.0 {
        return Err(PricingError::InvalidInput {
            message: format!("spot must be > 0, got {spot}"),
        });
    }
    if !strike.is_finite() || strike <= 0.0 {
        return Err(PricingError::InvalidInput {
            message: format!("strike must be > 0, got {strike}"),
        });
    }
    if !t_years.is_finite() || !rate.is_finite() {
        return Err(PricingError::InvalidInput {
            message: "time to expiry and rate must be finite".to_string(),
        });
    }
    Ok(())
}

fn expiry_boundary(spot: f64, strike: f64, right: OptionRight) -> GreeksResult {
    let (intrinsic, delta) = match right {
        OptionRight::Call => {
            let delta = if spot > strike {
                1.0
            } else if spot < strike {
                0.0
            } else {
                0.5
            };
            ((spot - strike).max(0.0), delta)
        }
        OptionRight::Put => {
            let delta = if spot < strike {
                -1.0
            } else if spot > strike {
                0.0
            } else {
                -0.5
            };
            ((strike - spot).max(0.0), delta)
        }
    };

    GreeksResult {
        price: intrinsic,
        delta,
        ..GreeksResult::ZERO
    }
}
