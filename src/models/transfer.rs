//! Transfer submission models

use crate::api::vaultpay::TransferReceipt;

/// Where one submission attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    Idle,
    Validating,
    Submitting,
    /// Behaves like `Idle` but an error message is on display
    Failed,
}

/// Raw user input, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub receiver_email: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    /// Backend acknowledged the transfer
    Completed(TransferReceipt),
    /// Refused locally; nothing was sent
    Rejected(String),
    /// Sent, but the backend or network reported a failure
    Failed(String),
    /// A submission was already in progress
    Ignored,
}
