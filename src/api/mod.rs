pub mod transport;
pub mod vaultpay;

pub use transport::{HttpTransport, ReqwestTransport};
pub use vaultpay::{ApiError, VaultPayClient};
