use annuity::{Loan, Method};
use log::{error, info};
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    for method in [Method::EqualPayment, Method::EqualPrincipal] {
        let loan = match Loan::new(200000., 180, 0.07, method) {
            Ok(loan) => loan,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        info!(
            "{} loan: total payment ${:.2}, total interest ${:.2}",
            method,
            loan.calculate_total_payment(),
            loan.calculate_total_interest()
        );
        loan.show_amortization();
    }
}

// verifies that types can implement the gated traits below
#[allow(dead_code)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<Loan>();
    is_normal::<annuity::Installment>();
    is_normal::<annuity::Config>();
}
