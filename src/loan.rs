use crate::config::{round, Config};
use crate::error::{Error, Result};
use crate::formula::{ipmt, pmt, ppmt, Timing};
use log::debug;
use std::fmt;

/// How a loan's principal is paid down.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// Same total payment every period; the principal share grows over time.
    #[default]
    EqualPayment,
    /// Same principal every period; the payment shrinks with the balance.
    EqualPrincipal,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::EqualPayment => write!(f, "equal payment"),
            Method::EqualPrincipal => write!(f, "equal principal"),
        }
    }
}

/// One row of an amortization schedule.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Installment {
    pub period: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub remaining_amount: f64,
}

impl Installment {
    /// Build a row from already rounded amounts.
    pub fn new(
        period: u32,
        payment: f64,
        principal: f64,
        interest: f64,
        remaining_amount: f64,
    ) -> Self {
        Self {
            period,
            payment,
            principal,
            interest,
            remaining_amount,
        }
    }
}

impl fmt::Display for Installment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "period {}, payment ${:.2}, principal ${:.2}, interest ${:.2}, remaining ${:.2}",
            self.period, self.payment, self.principal, self.interest, self.remaining_amount
        )
    }
}

/// A fixed-rate loan repaid in monthly installments.
///
/// `annual_rate` is a nominal decimal rate (0.07 for 7%); each period
/// accrues `annual_rate / 12`. Building the struct directly skips the
/// checks done by [`Loan::new`].
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loan {
    pub amount: f64,
    pub periods: u32,
    pub annual_rate: f64,
    pub method: Method,
    #[cfg_attr(feature = "serde", serde(default))]
    pub config: Config,
}

impl Loan {
    /// Validated constructor; rejects non-positive amounts, zero periods and
    /// non-finite rates.
    pub fn new(amount: f64, periods: u32, annual_rate: f64, method: Method) -> Result<Self> {
        if !amount.is_finite() || amount <= 0. {
            return Err(Error::invalid("amount", "must be a positive number"));
        }
        if periods == 0 {
            return Err(Error::invalid("periods", "must be at least 1"));
        }
        if !annual_rate.is_finite() {
            return Err(Error::invalid("annual_rate", "must be a finite number"));
        }

        Ok(Self {
            amount,
            periods,
            annual_rate,
            method,
            config: Config::default(),
        })
    }

    /// Replace the default solver and rounding settings.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Rate accrued each period, `annual_rate / 12`.
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.
    }

    /// Total due in `period`.
    pub fn calculate_payment(&self, period: u32) -> f64 {
        match self.method {
            Method::EqualPayment => {
                self.calculate_principal(period) + self.calculate_interest(period)
            }
            Method::EqualPrincipal => self.principal_share() + self.calculate_interest(period),
        }
    }

    /// The level payment of an equal-payment loan, or the first (largest)
    /// payment of an equal-principal one.
    pub fn calculate_periodic_payment(&self) -> f64 {
        match self.method {
            Method::EqualPayment => {
                pmt(self.monthly_rate(), self.periods, -self.amount, 0., Timing::End)
            }
            Method::EqualPrincipal => self.calculate_payment(1),
        }
    }

    /// Principal repaid in `period`.
    pub fn calculate_principal(&self, period: u32) -> f64 {
        match self.method {
            Method::EqualPayment => ppmt(
                self.monthly_rate(),
                period,
                self.periods,
                -self.amount,
                0.,
                Timing::End,
            ),
            Method::EqualPrincipal => self.principal_share(),
        }
    }

    /// Interest charged in `period`.
    pub fn calculate_interest(&self, period: u32) -> f64 {
        match self.method {
            Method::EqualPayment => ipmt(
                self.monthly_rate(),
                period,
                self.periods,
                -self.amount,
                0.,
                Timing::End,
            ),
            // balance before `period` is amount * (periods - period + 1) / periods
            Method::EqualPrincipal => {
                let periods = f64::from(self.periods);
                let remaining = periods - f64::from(period) + 1.;
                self.amount * remaining / periods * self.monthly_rate()
            }
        }
    }

    /// Sum of all payments over the term, rounded to `config.precision`.
    pub fn calculate_total_payment(&self) -> f64 {
        let monthly_rate = self.monthly_rate();
        let total = match self.method {
            Method::EqualPayment => {
                pmt(monthly_rate, self.periods, -self.amount, 0., Timing::End)
                    * f64::from(self.periods)
            }
            // interest on a balance falling by amount / periods is an arithmetic series
            Method::EqualPrincipal => {
                self.amount * (1. + monthly_rate * (1. + f64::from(self.periods)) / 2.)
            }
        };
        round(total, self.config.precision)
    }

    /// Total payment less the loan amount, rounded to `config.precision`.
    pub fn calculate_total_interest(&self) -> f64 {
        round(
            self.calculate_total_payment() - self.amount,
            self.config.precision,
        )
    }

    /// The full schedule, one row for each period `1..=periods`.
    ///
    /// Each amount is rounded on its own, so `payment` can differ from
    /// `principal + interest` by one unit in the last place. The remaining
    /// amount is the loan amount less that row's rounded principal.
    pub fn calculate_installments(&self) -> Vec<Installment> {
        let dec_places = self.config.precision;

        debug!(
            "amortizing {} over {} periods at {} ({})",
            self.amount, self.periods, self.annual_rate, self.method
        );

        let installments: Vec<Installment> = (1..=self.periods)
            .map(|period| {
                let principal = round(self.calculate_principal(period), dec_places);
                Installment::new(
                    period,
                    round(self.calculate_payment(period), dec_places),
                    principal,
                    round(self.calculate_interest(period), dec_places),
                    round(self.amount - principal, dec_places),
                )
            })
            .collect();

        debug!("generated {} installments", installments.len());
        installments
    }

    /// Print the schedule to stdout, one row per line.
    pub fn show_amortization(&self) {
        for installment in self.calculate_installments() {
            println!("{}", installment);
        }
    }

    fn principal_share(&self) -> f64 {
        self.amount / f64::from(self.periods)
    }
}
