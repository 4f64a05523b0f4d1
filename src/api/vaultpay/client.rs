use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::models::{
    AccountSnapshot, ApiError, HistoryPage, LoginRequest, LoginResponse, RegistrationRequest,
    TransferReceipt, TransferRequest,
};
use crate::api::transport::{ApiRequest, ApiResponse, HttpTransport};

/// VaultPay wallet API client
///
/// Generic over the transport so the session guard (or a test double) can sit
/// between the client and the network.
pub struct VaultPayClient<T> {
    transport: T,
}

impl<T: HttpTransport> VaultPayClient<T> {
    pub const LOGIN_PATH: &'static str = "users/login/";
    pub const REGISTER_PATH: &'static str = "users/register/";
    pub const PROFILE_PATH: &'static str = "users/profile/";
    pub const HISTORY_PATH: &'static str = "wallet/history/";
    pub const TRANSFER_PATH: &'static str = "wallet/transfer/";

    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Parse error response based on HTTP status code
    fn handle_error_response(response: ApiResponse) -> ApiError {
        let status_code = response.status.as_u16();
        let body_text = response.body;

        match response.status {
            StatusCode::BAD_REQUEST => {
                let body = serde_json::from_str::<serde_json::Value>(&body_text)
                    .unwrap_or(serde_json::Value::String(body_text));
                ApiError::Validation(body)
            }
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(body_text),
            StatusCode::FORBIDDEN => ApiError::Forbidden(body_text),
            StatusCode::NOT_FOUND => ApiError::NotFound(body_text),
            status if status.is_server_error() => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }

    async fn execute<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(Self::handle_error_response(response));
        }

        response.json::<R>()
    }

    /// POST users/login/
    ///
    /// Exchanges email and password for an access/refresh token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(ApiRequest::post(Self::LOGIN_PATH, &body)?).await
    }

    /// POST users/register/
    ///
    /// Field-keyed validation errors come back as `ApiError::Validation`.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<(), ApiError> {
        self.execute::<serde_json::Value>(ApiRequest::post(Self::REGISTER_PATH, request)?)
            .await
            .map(|_| ())
    }

    /// GET users/profile/
    pub async fn profile(&self) -> Result<AccountSnapshot, ApiError> {
        self.execute(ApiRequest::get(Self::PROFILE_PATH)).await
    }

    /// GET wallet/history/
    pub async fn history(&self) -> Result<HistoryPage, ApiError> {
        self.execute(ApiRequest::get(Self::HISTORY_PATH)).await
    }

    /// POST wallet/transfer/
    ///
    /// The backend collapses repeated submissions carrying the same
    /// idempotency key into one settlement.
    pub async fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, ApiError> {
        self.execute(ApiRequest::post(Self::TRANSFER_PATH, request)?).await
    }
}
