use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::navigator::{Navigator, Route};
use super::store::SessionStore;
use crate::api::transport::{ApiRequest, ApiResponse, HttpTransport};
use crate::api::ApiError;

/// Transport decorator that authenticates every request and tears the
/// session down on the first 401.
///
/// There is no refresh-token exchange: an expired access token always sends
/// the user back to the login view.
pub struct SessionGuard<T> {
    inner: T,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl<T> SessionGuard<T> {
    pub fn new(inner: T, store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            inner,
            store,
            navigator,
        }
    }

    /// Sets `Authorization: Bearer <access_token>` when a session exists.
    /// Requests go out untouched otherwise.
    pub fn attach_credential(&self, request: &mut ApiRequest) {
        let Some(credentials) = self.store.get() else {
            return;
        };

        match HeaderValue::from_str(&format!("Bearer {}", credentials.access_token)) {
            Ok(value) => {
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(e) => warn!("Stored access token is not a valid header value: {}", e),
        }
    }

    /// Inspects one outcome. A 401 clears the session, navigates to login and
    /// is returned to the caller as an error; everything else passes through.
    pub fn on_response(
        &self,
        outcome: Result<ApiResponse, ApiError>,
    ) -> Result<ApiResponse, ApiError> {
        match outcome {
            Ok(response) if response.status == StatusCode::UNAUTHORIZED => {
                self.end_session();
                Err(ApiError::Unauthorized(response.body))
            }
            Err(error) if error.is_unauthorized() => {
                self.end_session();
                Err(error)
            }
            other => other,
        }
    }

    fn end_session(&self) {
        warn!("Credential rejected by the server, ending session");
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored session: {}", e);
        }
        self.navigator.navigate(Route::Login);
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for SessionGuard<T> {
    async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.attach_credential(&mut request);
        debug!(
            method = %request.method,
            path = %request.path,
            authenticated = request.bearer_token().is_some(),
            "Sending request"
        );

        let outcome = self.inner.send(request).await;
        self.on_response(outcome)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::transport::testing::ScriptedTransport;
    use crate::api::VaultPayClient;
    use crate::session::navigator::testing::RecordingNavigator;
    use crate::session::store::{CredentialPair, MemorySessionStore};

    struct Fixture {
        transport: Arc<ScriptedTransport>,
        store: Arc<MemorySessionStore>,
        navigator: Arc<RecordingNavigator>,
        client: VaultPayClient<SessionGuard<Arc<ScriptedTransport>>>,
    }

    fn fixture(store: MemorySessionStore) -> Fixture {
        let transport = Arc::new(ScriptedTransport::new());
        let store = Arc::new(store);
        let navigator = Arc::new(RecordingNavigator::new());
        let guard = SessionGuard::new(transport.clone(), store.clone(), navigator.clone());
        Fixture {
            transport,
            store,
            navigator,
            client: VaultPayClient::new(guard),
        }
    }

    fn signed_in() -> MemorySessionStore {
        MemorySessionStore::with_credentials(CredentialPair {
            access_token: "tok-1".to_string(),
            refresh_token: "ref-1".to_string(),
        })
    }

    #[tokio::test]
    async fn test_bearer_attached_when_signed_in() {
        let f = fixture(signed_in());
        f.transport.push(200, json!({"results": []}));

        f.client.history().await.unwrap();

        let request = &f.transport.requests()[0];
        assert_eq!(request.bearer_token(), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_no_header_without_session() {
        let f = fixture(MemorySessionStore::new());
        f.transport.push(200, json!({"access": "a", "refresh": "r"}));

        f.client.login("a@x.com", "pw").await.unwrap();

        let request = &f.transport.requests()[0];
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_tears_down_once_and_reraises() {
        let f = fixture(signed_in());
        f.transport.push(401, json!({"detail": "Token is invalid or expired"}));

        let err = f.client.profile().await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(f.store.get(), None);
        assert_eq!(f.navigator.visits(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn test_unauthorized_from_any_endpoint() {
        let f = fixture(signed_in());
        f.transport.push(401, json!({}));
        f.transport.push(401, json!({}));

        let _ = f.client.history().await;
        let _ = f.client.login("a@x.com", "wrong").await;

        assert_eq!(f.navigator.visits(), vec![Route::Login, Route::Login]);
    }

    #[tokio::test]
    async fn test_other_failures_pass_through() {
        let f = fixture(signed_in());
        f.transport.push(400, json!({"error": "Insufficient funds"}));
        f.transport
            .push_error(ApiError::RequestError("connection refused".to_string()));

        assert!(matches!(
            f.client.profile().await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            f.client.profile().await,
            Err(ApiError::RequestError(_))
        ));
        assert!(f.store.get().is_some());
        assert!(f.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_session_cleared_mid_flight_leaves_later_requests_bare() {
        let f = fixture(signed_in());
        f.transport.push(401, json!({}));
        f.transport.push(200, json!({"access": "a", "refresh": "r"}));

        let _ = f.client.profile().await;
        f.client.login("a@x.com", "pw").await.unwrap();

        let requests = f.transport.requests();
        assert_eq!(requests[0].bearer_token(), Some("tok-1"));
        assert_eq!(requests[1].bearer_token(), None);
    }
}
