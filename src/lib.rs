//! Time-value-of-money formulas and loan amortization schedules.
//!
//! [`formula`] holds the spreadsheet-style annuity functions (PMT, IPMT,
//! PPMT, PV, FV, NPER, RATE). [`loan`] builds equal-payment and
//! equal-principal amortization schedules on top of them.

pub mod basis;
pub mod config;
pub mod error;
pub mod formula;
pub mod loan;

pub use basis::DayCountBasis;
pub use config::{round, Config};
pub use error::{Error, Result};
pub use formula::{fv, ipmt, nper, pmt, ppmt, pv, rate, rate_with_config, Timing};
pub use loan::{Installment, Loan, Method};
