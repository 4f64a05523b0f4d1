use std::sync::Arc;

use tracing::{info, warn};

use crate::api::vaultpay::RegistrationRequest;
use crate::api::{HttpTransport, VaultPayClient};
use crate::session::{CredentialPair, Navigator, Route, SessionStore};
use crate::utils::errors::user_message;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";
pub const NATIONAL_ID_TOO_SHORT: &str = "Aadhaar number must be at least 12 digits.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please check your details.";

const MIN_NATIONAL_ID_LEN: usize = 12;

/// Login, registration and logout on top of the session store
pub struct AuthService<T> {
    client: Arc<VaultPayClient<T>>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl<T: HttpTransport> AuthService<T> {
    pub fn new(
        client: Arc<VaultPayClient<T>>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            client,
            store,
            navigator,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get().is_some()
    }

    /// Stores the new token pair and opens the dashboard
    pub async fn login(&self, email: &str, password: &str) -> Result<(), String> {
        let tokens = match self.client.login(email, password).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Login failed for {}: {}", email, e);
                return Err(INVALID_CREDENTIALS.to_string());
            }
        };

        self.store
            .set(CredentialPair::from(tokens))
            .map_err(|e| format!("Could not save session: {}", e))?;

        info!("Logged in as {}", email);
        self.navigator.navigate(Route::Dashboard);
        Ok(())
    }

    /// Creates the account and sends the user to the login view
    pub async fn register(&self, request: &RegistrationRequest) -> Result<(), String> {
        if request.aadhaar_number.trim().chars().count() < MIN_NATIONAL_ID_LEN {
            return Err(NATIONAL_ID_TOO_SHORT.to_string());
        }

        if let Err(e) = self.client.register(request).await {
            warn!("Registration failed for {}: {}", request.email, e);
            return Err(user_message(&e, &["email", "aadhaar_number"], REGISTRATION_FAILED));
        }

        info!("Registered {}", request.email);
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), String> {
        self.store
            .clear()
            .map_err(|e| format!("Could not clear session: {}", e))?;

        info!("Logged out");
        self.navigator.navigate(Route::Login);
        Ok(())
    }
}
