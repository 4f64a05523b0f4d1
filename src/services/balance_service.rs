use rust_decimal::Decimal;

use crate::models::BalanceTrend;

/// Compares each observed balance with the one before it
#[derive(Debug, Default)]
pub struct BalanceTracker {
    previous: Option<Decimal>,
}

impl BalanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, balance: Decimal) -> BalanceTrend {
        let trend = match self.previous {
            Some(previous) if balance > previous => BalanceTrend::Up,
            Some(previous) if balance < previous => BalanceTrend::Down,
            _ => BalanceTrend::Unchanged,
        };
        self.previous = Some(balance);
        trend
    }
}

pub fn format_balance(balance: Decimal, trend: BalanceTrend) -> String {
    format!("₹{:.2} {}", balance, trend.arrow()).trim_end().to_string()
}
