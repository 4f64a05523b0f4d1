//! Data models for VaultPay console views and services
//!
//! Wire types live in `api::vaultpay::models`; these are the shapes the
//! services hand to the console.

pub mod balance;
pub mod history;
pub mod profile;
pub mod transfer;

pub use balance::BalanceTrend;
pub use history::{Direction, HistoryRow};
pub use profile::ProfileView;
pub use transfer::{TransferForm, TransferOutcome, TransferPhase};
