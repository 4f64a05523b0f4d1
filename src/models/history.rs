//! Transaction history models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::api::vaultpay::TransactionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

/// One history entry as seen by the signed-in account
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub reference: String,
    pub direction: Direction,
    pub counterparty: String,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRow {
    /// First eight characters of the reference, then `...`
    pub fn short_reference(&self) -> String {
        format!("{}...", self.reference.chars().take(8).collect::<String>())
    }

    pub fn signed_amount(&self) -> String {
        let sign = match self.direction {
            Direction::Sent => '-',
            Direction::Received => '+',
        };
        format!("{}₹{:.2}", sign, self.amount)
    }
}
