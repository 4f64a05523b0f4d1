use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::session::CredentialPair;

/// Body for POST users/login/
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair returned by a successful login
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
}

impl From<LoginResponse> for CredentialPair {
    fn from(response: LoginResponse) -> Self {
        CredentialPair {
            access_token: response.access,
            refresh_token: response.refresh,
        }
    }
}

/// Body for POST users/register/
#[derive(Clone, Serialize)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub aadhaar_number: String,
    pub password: String,
}

/// Response from GET users/profile/
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    #[serde(default)]
    pub id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub wallet_balance: Decimal,
    /// Decrypted by the backend for the account owner only
    #[serde(default, rename = "aadhaar_number")]
    pub national_id: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Success,
    Failed,
    Pending,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// One entry of the wallet history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub reference_id: Uuid,
    pub sender_email: String,
    pub receiver_email: String,
    pub amount: Decimal,
    pub status: TransactionStatus,
    #[serde(rename = "created_at", alias = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Response from GET wallet/history/, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<TransactionRecord>,
}

/// Body for POST wallet/transfer/
///
/// Built fresh for every submission attempt, so each carries its own key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRequest {
    pub receiver_email: String,
    pub amount: Decimal,
    pub idempotency_key: Uuid,
}

impl TransferRequest {
    pub fn new(receiver_email: String, amount: Decimal) -> Self {
        Self {
            receiver_email,
            amount,
            idempotency_key: Uuid::new_v4(),
        }
    }
}

/// Acknowledgement of a settled transfer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub new_balance: Option<Decimal>,
}

/// Comprehensive error type for API operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 400 Bad Request, with the structured body kept for field lookups
    #[error("Validation failed: {0}")]
    Validation(serde_json::Value),
    /// 401 Unauthorized
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// 403 Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// 404 Not Found
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Deserialization error
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Structured error body, when the server sent JSON
    pub fn payload(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Validation(body) => Some(body.clone()),
            ApiError::Unauthorized(body)
            | ApiError::Forbidden(body)
            | ApiError::NotFound(body)
            | ApiError::ServerError(_, body)
            | ApiError::HttpError(_, body) => serde_json::from_str(body).ok(),
            ApiError::RequestError(_) | ApiError::DeserializationError(_) => None,
        }
    }
}
