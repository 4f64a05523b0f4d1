pub mod client;
pub mod models;

pub use client::VaultPayClient;
pub use models::{
    AccountSnapshot, ApiError, HistoryPage, RegistrationRequest, TransactionStatus,
    TransferReceipt, TransferRequest,
};
