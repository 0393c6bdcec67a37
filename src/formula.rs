//! Spreadsheet-style annuity functions.
//!
//! Cash paid out is negative and cash received is positive, so a present
//! value and the payment that amortizes it carry opposite signs. None of
//! these functions fail: degenerate input yields `0.0` or `NaN`, and callers
//! must check for non-finite results.

use crate::config::Config;
use log::trace;
use std::fmt;

/// When in each period a payment falls.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Payment at the end of the period (ordinary annuity).
    #[default]
    End,
    /// Payment at the start of the period (annuity due).
    Start,
}

impl Timing {
    /// 0 for `End`, 1 for `Start`; the `due` term in `(1 + rate * due)`.
    pub fn factor(self) -> f64 {
        match self {
            Timing::End => 0.,
            Timing::Start => 1.,
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timing::End => write!(f, "end of period"),
            Timing::Start => write!(f, "start of period"),
        }
    }
}

/// Payment per period for a loan or annuity with constant payments and rate.
///
/// ```text
///                  pv * (1 + rate)^nper + fv
/// pmt = - -------------------------------------------
///          (1 + rate * due) * ((1 + rate)^nper - 1) / rate
/// ```
///
/// At `rate == 0` this reduces to `-(pv + fv) / nper`.
pub fn pmt(rate: f64, nper: u32, pv: f64, fv: f64, timing: Timing) -> f64 {
    let pvif = pvif(rate, nper);
    let fvifa = fvifa(rate, nper);

    -(pv * pvif + fv) / ((1. + rate * timing.factor()) * fvifa)
}

/// Interest portion of payment number `per` (1-based).
///
/// Periods outside `1..=nper` have no payment and return 0.
pub fn ipmt(rate: f64, per: u32, nper: u32, pv: f64, fv: f64, timing: Timing) -> f64 {
    if per < 1 || per > nper {
        return 0.;
    }

    let pmt = pmt(rate, nper, pv, fv, timing);
    accrued_interest(pv, pmt, rate, per - 1)
}

/// Principal portion of payment number `per` (1-based).
///
/// Periods outside `1..=nper` have no payment and return 0.
pub fn ppmt(rate: f64, per: u32, nper: u32, pv: f64, fv: f64, timing: Timing) -> f64 {
    if per < 1 || per > nper {
        return 0.;
    }

    let pmt = pmt(rate, nper, pv, fv, timing);
    pmt - accrued_interest(pv, pmt, rate, per - 1)
}

/// Present value of `nper` payments of `pmt` plus a final `fv`.
///
/// ```text
///        -pmt * (1 + rate * due) * ((1 + rate)^nper - 1) / rate - fv
/// pv = -------------------------------------------------------------
///                           (1 + rate)^nper
/// ```
pub fn pv(rate: f64, nper: u32, pmt: f64, fv: f64, timing: Timing) -> f64 {
    let pvif = pvif(rate, nper);
    let fvifa = fvifa(rate, nper);

    (-pmt * (1. + rate * timing.factor()) * fvifa - fv) / pvif
}

/// Future value after `nper` payments of `pmt` on a starting balance `pv`.
///
/// ```text
/// fv = -pmt * (1 + rate * due) * ((1 + rate)^nper - 1) / rate - pv * (1 + rate)^nper
/// ```
pub fn fv(rate: f64, nper: u32, pmt: f64, pv: f64, timing: Timing) -> f64 {
    let pvif = pvif(rate, nper);
    let fvifa = fvifa(rate, nper);

    -pmt * (1. + rate * timing.factor()) * fvifa - pv * pvif
}

/// Number of periods needed to move `pv` to `fv` with payments of `pmt`.
///
/// ```text
///          ln((pmt * (1 + rate * due) - fv * rate) / (pmt * (1 + rate * due) + pv * rate))
/// nper = ----------------------------------------------------------------------------------
///                                        ln(1 + rate)
/// ```
///
/// Returns 0 for a non-positive rate without a payment to divide by, and
/// when the logarithm's argument is not positive.
pub fn nper(rate: f64, pmt: f64, pv: f64, fv: f64, timing: Timing) -> f64 {
    if rate == 0. && pmt != 0. {
        return -fv / pmt - pv / pmt;
    }

    if rate <= 0. {
        return 0.;
    }

    let initial = pmt * (1. + rate * timing.factor());

    let ratio = (initial - fv * rate) / (pv * rate + initial);
    if ratio <= 0. {
        return 0.;
    }

    ratio.ln() / (1. + rate).ln()
}

/// Interest rate per period, solved with default solver settings.
///
/// See [`rate_with_config`].
pub fn rate(nper: u32, pmt: f64, pv: f64, fv: f64, timing: Timing, guess: f64) -> f64 {
    rate_with_config(&Config::default(), nper, pmt, pv, fv, timing, guess)
}

/// Interest rate per period of an annuity.
///
/// Finds a root of
///
/// ```text
/// pv * (1 + rate)^nper + pmt * (1 / rate + due) * ((1 + rate)^nper - 1) + fv = 0
/// ```
///
/// with the secant method, starting from the pair `(0, guess)`. Stops once
/// successive residuals differ by no more than `config.accuracy` or after
/// `config.max_iterations` steps and returns the last iterate, which is
/// `NaN` when the iteration degenerates (for instance `guess == 0`).
pub fn rate_with_config(
    config: &Config,
    nper: u32,
    pmt: f64,
    pv: f64,
    fv: f64,
    timing: Timing,
    guess: f64,
) -> f64 {
    let n = f64::from(nper);
    let due = timing.factor();

    // residual and growth factor (1 + rate)^n, the latter only when computed
    let residual = |rate: f64| -> (f64, Option<f64>) {
        if rate.abs() < config.accuracy {
            (pv * (1. + n * rate) + pmt * (1. + rate * due) * n + fv, None)
        } else {
            let growth = (n * (1. + rate).ln()).exp();
            (pv * growth + pmt * (1. / rate + due) * (growth - 1.) + fv, Some(growth))
        }
    };

    let growth = residual(guess).1.unwrap_or(0.);

    let mut x0 = 0.;
    let mut x1 = guess;
    let mut y0 = pv + pmt * n + fv;
    let mut y1 = pv * growth + pmt * (1. / guess + due) * (growth - 1.) + fv;
    let mut rate = guess;
    let mut iterations = 0;

    while (y0 - y1).abs() > config.accuracy && iterations < config.max_iterations {
        rate = (y1 * x0 - y0 * x1) / (y1 - y0);
        x0 = x1;
        x1 = rate;

        y0 = y1;
        y1 = residual(rate).0;
        iterations += 1;

        trace!(
            "rate iteration {}, estimate {}, residual {}",
            iterations,
            rate,
            y1
        );
    }

    rate
}

// (1 + rate)^nper
fn pvif(rate: f64, nper: u32) -> f64 {
    compound(rate, nper)
}

// ((1 + rate)^nper - 1) / rate, with its limit nper at rate == 0
fn fvifa(rate: f64, nper: u32) -> f64 {
    if rate == 0. {
        return f64::from(nper);
    }

    (compound(rate, nper) - 1.) / rate
}

// interest accrued in the period following `per` payments of `pmt`
fn accrued_interest(pv: f64, pmt: f64, rate: f64, per: u32) -> f64 {
    let growth = compound(rate, per);
    -(pv * growth * rate + pmt * (growth - 1.))
}

// (1 + rate)^n by repeated squaring; powf only past i32::MAX
fn compound(rate: f64, n: u32) -> f64 {
    match i32::try_from(n) {
        Ok(n) => (1. + rate).powi(n),
        Err(_) => (1. + rate).powf(f64::from(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::{fv, ipmt, nper, pmt, ppmt, pv, rate, rate_with_config, Timing};
    use crate::config::Config;
    use approx::{assert_relative_eq, assert_ulps_eq};
    use proptest::prelude::*;
    use test_log::test;

    // 4.9% / 12, rounded once from the exact quotient
    const MONTHLY_RATE: f64 = 0.004083333333333333;
    const PERIODS: u32 = 12 * 30;
    const AMOUNT: f64 = 1000000.;

    #[test]
    fn test_pmt() {
        assert_eq!(
            pmt(MONTHLY_RATE, PERIODS, AMOUNT, 0., Timing::End),
            -5307.267206228046
        );
        assert_eq!(
            pmt(MONTHLY_RATE, PERIODS, AMOUNT, 0., Timing::Start),
            -5285.683996575363
        );
        assert_eq!(pmt(0., PERIODS, AMOUNT, 0., Timing::End), -2777.777777777778);
    }

    #[test]
    fn test_pmt_zero_rate_includes_fv() {
        assert_ulps_eq!(pmt(0., 10, 1000., 500., Timing::End), -150.);
        assert_ulps_eq!(pmt(0., 10, 1000., 500., Timing::Start), -150.);
    }

    #[test]
    fn test_ipmt() {
        assert_eq!(ipmt(MONTHLY_RATE, 0, PERIODS, AMOUNT, 0., Timing::End), 0.);
        assert_eq!(
            ipmt(MONTHLY_RATE, 1, PERIODS, AMOUNT, 0., Timing::End),
            -4083.333333333333
        );
        assert_eq!(
            ipmt(MONTHLY_RATE, PERIODS + 1, PERIODS, AMOUNT, 0., Timing::End),
            0.
        );
    }

    #[test]
    fn test_ppmt() {
        assert_eq!(ppmt(MONTHLY_RATE, 0, PERIODS, AMOUNT, 0., Timing::End), 0.);
        assert_eq!(
            ppmt(MONTHLY_RATE, 1, PERIODS, AMOUNT, 0., Timing::End),
            -1223.9338728947132
        );
        assert_eq!(
            ppmt(MONTHLY_RATE, PERIODS + 1, PERIODS, AMOUNT, 0., Timing::End),
            0.
        );
    }

    #[test]
    fn test_ipmt_plus_ppmt_is_pmt() {
        let payment = pmt(MONTHLY_RATE, PERIODS, AMOUNT, 0., Timing::End);
        for per in [1, 2, 59, 180, 359, PERIODS] {
            let split = ipmt(MONTHLY_RATE, per, PERIODS, AMOUNT, 0., Timing::End)
                + ppmt(MONTHLY_RATE, per, PERIODS, AMOUNT, 0., Timing::End);
            assert_relative_eq!(split, payment, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_principal_repaid_over_term() {
        let repaid: f64 = (1..=PERIODS)
            .map(|per| ppmt(MONTHLY_RATE, per, PERIODS, AMOUNT, 0., Timing::End))
            .sum();
        assert_relative_eq!(repaid, -AMOUNT, max_relative = 1e-9);
    }

    #[test]
    fn test_pv() {
        assert_eq!(
            pv(MONTHLY_RATE, PERIODS, 1000., 0., Timing::End),
            -188420.8880281185
        );
        assert_ulps_eq!(pv(0., 10, 100., 50., Timing::End), -1050.);
    }

    #[test]
    fn test_fv() {
        assert_eq!(
            fv(MONTHLY_RATE, PERIODS, 1000., 0., Timing::End),
            -817037.6048461755
        );
        assert_ulps_eq!(fv(0., 10, 100., 50., Timing::End), -1050.);
    }

    #[test]
    fn test_nper() {
        let pmt = 5307.;
        let pv = 1000000.;

        assert_eq!(nper(0., 0., pv, 0., Timing::End), 0.);
        assert_eq!(nper(0., pmt, pv, 0., Timing::End), -188.43037497644622);
        assert_eq!(
            nper(MONTHLY_RATE, pmt, pv, 0., Timing::End),
            -140.03715468730746
        );
        assert_eq!(nper(MONTHLY_RATE, pmt, pv, 2000000., Timing::End), 0.);
        assert_eq!(nper(-0.01, pmt, pv, 0., Timing::End), 0.);
    }

    #[test]
    fn test_nper_recovers_term() {
        let payment = pmt(MONTHLY_RATE, PERIODS, AMOUNT, 0., Timing::End);
        assert_relative_eq!(
            nper(MONTHLY_RATE, payment, AMOUNT, 0., Timing::End),
            f64::from(PERIODS),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_rate() {
        assert_eq!(
            rate(12, 3612.82, 41817.82, 0., Timing::End, 0.1),
            -1.4155398849824252
        );
        assert!(rate(12, 3612.82, 41817.82, 0., Timing::End, 0.).is_nan());
    }

    #[test]
    fn test_rate_recovers_loan_rate() {
        let payment = pmt(MONTHLY_RATE, PERIODS, AMOUNT, 0., Timing::End);
        let solved = rate(PERIODS, payment, AMOUNT, 0., Timing::End, 0.01);
        assert_relative_eq!(solved, MONTHLY_RATE, max_relative = 1e-6);
    }

    #[test]
    fn test_rate_stops_at_max_iterations() {
        // no iterations: the guess comes straight back
        let config = Config::default().with_max_iterations(0);
        assert_eq!(
            rate_with_config(&config, 12, 3612.82, 41817.82, 0., Timing::End, 0.1),
            0.1
        );
    }

    fn any_timing() -> impl Strategy<Value = Timing> {
        prop_oneof![Just(Timing::End), Just(Timing::Start)]
    }

    fn any_rate() -> impl Strategy<Value = f64> {
        prop_oneof![Just(0.), -0.02..0.02f64, 0.02..0.15f64]
    }

    fn signed_amount(low: f64, high: f64) -> impl Strategy<Value = f64> {
        (low..high, any::<bool>())
            .prop_map(|(amount, negative)| if negative { -amount } else { amount })
    }

    proptest! {
        #[test]
        fn test_pv_inverts_pmt(
            rate in any_rate(),
            nper in 1u32..=480,
            present in signed_amount(1e3, 1e6),
            future in signed_amount(0., 1e6),
            timing in any_timing(),
        ) {
            let payment = pmt(rate, nper, present, future, timing);
            let recovered = pv(rate, nper, payment, future, timing);
            let scale = present.abs().max(future.abs());
            prop_assert!(
                (recovered - present).abs() <= 1e-8 * scale,
                "pv {} came back as {} (pmt {})",
                present,
                recovered,
                payment
            );
        }
    }
}
