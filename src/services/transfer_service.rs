use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::api::vaultpay::TransferRequest;
use crate::api::{HttpTransport, VaultPayClient};
use crate::cache::{Invalidate, ResourceKey};
use crate::models::{TransferForm, TransferOutcome, TransferPhase};
use crate::utils::errors::user_message;

pub const INSUFFICIENT_FUNDS: &str = "Insufficient funds in wallet.";
pub const MISSING_RECIPIENT: &str = "Please enter the receiver's email.";
pub const INVALID_AMOUNT: &str = "Please enter a valid amount.";
pub const NON_POSITIVE_AMOUNT: &str = "Amount must be positive.";
pub const TRANSFER_FAILED: &str = "Transfer failed. Please check details.";

struct TransferState {
    phase: TransferPhase,
    form: TransferForm,
    error: Option<String>,
    open: bool,
}

/// Drives one transfer form through validate, submit and settle.
///
/// The balance check runs against whatever snapshot the caller holds, so it
/// can be stale; the backend still has the final say.
pub struct TransferController<T> {
    client: Arc<VaultPayClient<T>>,
    invalidator: Arc<dyn Invalidate>,
    state: Mutex<TransferState>,
}

impl<T: HttpTransport> TransferController<T> {
    pub fn new(client: Arc<VaultPayClient<T>>, invalidator: Arc<dyn Invalidate>) -> Self {
        Self {
            client,
            invalidator,
            state: Mutex::new(TransferState {
                phase: TransferPhase::Idle,
                form: TransferForm::default(),
                error: None,
                open: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TransferState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn open(&self) {
        self.lock().open = true;
    }

    pub fn close(&self) {
        self.lock().open = false;
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    #[cfg(test)]
    pub fn phase(&self) -> TransferPhase {
        self.lock().phase
    }

    #[cfg(test)]
    pub fn form(&self) -> TransferForm {
        self.lock().form.clone()
    }

    /// Last error, kept until the next submission or field edit
    #[cfg(test)]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn set_receiver_email(&self, receiver_email: &str) {
        let mut state = self.lock();
        state.form.receiver_email = receiver_email.to_string();
        state.error = None;
    }

    pub fn set_amount(&self, amount: &str) {
        let mut state = self.lock();
        state.form.amount = amount.to_string();
        state.error = None;
    }

    /// Submits the current form. Inert while a submission is in flight.
    pub async fn submit(&self, known_balance: Decimal) -> TransferOutcome {
        let request = {
            let mut state = self.lock();
            if state.phase == TransferPhase::Submitting {
                debug!("Transfer already submitting, ignoring");
                return TransferOutcome::Ignored;
            }

            state.error = None;
            state.phase = TransferPhase::Validating;

            match validate(&state.form, known_balance) {
                Ok((receiver_email, amount)) => {
                    state.phase = TransferPhase::Submitting;
                    TransferRequest::new(receiver_email, amount)
                }
                Err(message) => {
                    debug!("Transfer rejected locally: {}", message);
                    state.phase = TransferPhase::Failed;
                    state.error = Some(message.to_string());
                    return TransferOutcome::Rejected(message.to_string());
                }
            }
        };

        info!(
            idempotency_key = %request.idempotency_key,
            amount = %request.amount,
            "Submitting transfer"
        );

        match self.client.transfer(&request).await {
            Ok(receipt) => {
                self.invalidator.invalidate(ResourceKey::AccountProfile);
                self.invalidator.invalidate(ResourceKey::TransactionHistory);

                let mut state = self.lock();
                state.form = TransferForm::default();
                state.open = false;
                state.phase = TransferPhase::Idle;
                info!(idempotency_key = %request.idempotency_key, "Transfer completed");
                TransferOutcome::Completed(receipt)
            }
            Err(e) => {
                warn!(idempotency_key = %request.idempotency_key, "Transfer failed: {}", e);
                let message = user_message(&e, &["error"], TRANSFER_FAILED);

                let mut state = self.lock();
                state.phase = TransferPhase::Failed;
                state.error = Some(message.clone());
                TransferOutcome::Failed(message)
            }
        }
    }
}

/// Recipient present, amount a positive decimal no larger than the balance
fn validate(form: &TransferForm, known_balance: Decimal) -> Result<(String, Decimal), &'static str> {
    let receiver_email = form.receiver_email.trim();
    if receiver_email.is_empty() {
        return Err(MISSING_RECIPIENT);
    }

    let amount = Decimal::from_str(form.amount.trim()).map_err(|_| INVALID_AMOUNT)?;
    if amount <= Decimal::ZERO {
        return Err(NON_POSITIVE_AMOUNT);
    }
    if amount > known_balance {
        return Err(INSUFFICIENT_FUNDS);
    }

    Ok((receiver_email.to_string(), amount))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;
    use crate::api::transport::testing::ScriptedTransport;
    use crate::api::transport::{ApiRequest, ApiResponse};
    use crate::api::ApiError;
    use crate::cache::testing::RecordingInvalidator;

    struct Fixture {
        transport: Arc<ScriptedTransport>,
        invalidator: Arc<RecordingInvalidator>,
        controller: TransferController<Arc<ScriptedTransport>>,
    }

    fn fixture() -> Fixture {
        let transport = Arc::new(ScriptedTransport::new());
        let invalidator = Arc::new(RecordingInvalidator::new());
        let controller = TransferController::new(
            Arc::new(VaultPayClient::new(transport.clone())),
            invalidator.clone(),
        );
        Fixture {
            transport,
            invalidator,
            controller,
        }
    }

    fn fill(controller: &TransferController<Arc<ScriptedTransport>>, email: &str, amount: &str) {
        controller.open();
        controller.set_receiver_email(email);
        controller.set_amount(amount);
    }

    fn sent_key(request: &ApiRequest) -> String {
        request.body.as_ref().unwrap()["idempotency_key"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_insufficient_funds_never_hits_network() {
        let f = fixture();
        fill(&f.controller, "b@x.com", "150");

        let outcome = f.controller.submit(Decimal::new(100, 0)).await;

        assert_eq!(outcome, TransferOutcome::Rejected(INSUFFICIENT_FUNDS.to_string()));
        assert_eq!(f.controller.error().as_deref(), Some("Insufficient funds in wallet."));
        assert_eq!(f.controller.phase(), TransferPhase::Failed);
        assert_eq!(f.transport.request_count(), 0);
        assert!(f.invalidator.keys().is_empty());
    }

    #[tokio::test]
    async fn test_success_invalidates_and_resets_form() {
        let f = fixture();
        f.transport.push(
            200,
            json!({"message": "Transfer Successful", "transaction_id": "t-1", "new_balance": 50.0}),
        );
        fill(&f.controller, "b@x.com", "50");

        let outcome = f.controller.submit(Decimal::new(100, 0)).await;

        assert!(matches!(outcome, TransferOutcome::Completed(_)));
        assert_eq!(f.transport.request_count(), 1);
        assert_eq!(
            f.invalidator.keys(),
            vec![ResourceKey::AccountProfile, ResourceKey::TransactionHistory]
        );
        assert_eq!(f.controller.form(), TransferForm::default());
        assert!(!f.controller.is_open());
        assert_eq!(f.controller.phase(), TransferPhase::Idle);

        let body = f.transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["receiver_email"], "b@x.com");
        assert_eq!(body["amount"], "50");
    }

    #[tokio::test]
    async fn test_retry_after_failure_uses_new_key() {
        let f = fixture();
        f.transport.push(400, json!({"error": "Receiver does not exist."}));
        f.transport.push(200, json!({"message": "Transfer Successful"}));
        fill(&f.controller, "b@x.com", "50");

        let first = f.controller.submit(Decimal::new(100, 0)).await;
        assert_eq!(first, TransferOutcome::Failed("Receiver does not exist.".to_string()));
        assert!(f.controller.is_open());
        assert_eq!(f.controller.form().amount, "50");

        let second = f.controller.submit(Decimal::new(100, 0)).await;
        assert!(matches!(second, TransferOutcome::Completed(_)));

        let requests = f.transport.requests();
        assert_eq!(requests.len(), 2);
        assert_ne!(sent_key(&requests[0]), sent_key(&requests[1]));
    }

    #[tokio::test]
    async fn test_unexplained_failure_uses_generic_message() {
        let f = fixture();
        f.transport
            .push_error(ApiError::RequestError("connection reset".to_string()));
        fill(&f.controller, "b@x.com", "10");

        let outcome = f.controller.submit(Decimal::new(100, 0)).await;

        assert_eq!(outcome, TransferOutcome::Failed(TRANSFER_FAILED.to_string()));
        assert!(f.invalidator.keys().is_empty());
    }

    #[tokio::test]
    async fn test_local_checks() {
        let f = fixture();
        let balance = Decimal::new(100, 0);

        fill(&f.controller, "  ", "10");
        assert_eq!(
            f.controller.submit(balance).await,
            TransferOutcome::Rejected(MISSING_RECIPIENT.to_string())
        );

        fill(&f.controller, "b@x.com", "ten");
        assert_eq!(
            f.controller.submit(balance).await,
            TransferOutcome::Rejected(INVALID_AMOUNT.to_string())
        );

        fill(&f.controller, "b@x.com", "0");
        assert_eq!(
            f.controller.submit(balance).await,
            TransferOutcome::Rejected(NON_POSITIVE_AMOUNT.to_string())
        );

        fill(&f.controller, "b@x.com", "-5");
        assert_eq!(
            f.controller.submit(balance).await,
            TransferOutcome::Rejected(NON_POSITIVE_AMOUNT.to_string())
        );

        // Exactly the balance is allowed
        fill(&f.controller, "b@x.com", "100.00");
        assert!(matches!(
            f.controller.submit(balance).await,
            TransferOutcome::Completed(_)
        ));
        assert_eq!(f.transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_field_edit_clears_error() {
        let f = fixture();
        fill(&f.controller, "b@x.com", "500");
        f.controller.submit(Decimal::new(100, 0)).await;
        assert!(f.controller.error().is_some());

        f.controller.set_amount("50");
        assert!(f.controller.error().is_none());
    }

    /// Holds the response until released, to observe the Submitting phase
    struct SlowTransport {
        release: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl HttpTransport for SlowTransport {
        async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, ApiError> {
            self.release.notified().await;
            Ok(ApiResponse::new(reqwest::StatusCode::OK, "{}"))
        }
    }

    #[tokio::test]
    async fn test_resubmit_while_submitting_is_inert() {
        let release = Arc::new(Notify::new());
        let invalidator = Arc::new(RecordingInvalidator::new());
        let controller = Arc::new(TransferController::new(
            Arc::new(VaultPayClient::new(SlowTransport {
                release: release.clone(),
            })),
            invalidator.clone(),
        ));
        controller.set_receiver_email("b@x.com");
        controller.set_amount("5");

        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit(Decimal::new(100, 0)).await }
        });
        while controller.phase() != TransferPhase::Submitting {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            controller.submit(Decimal::new(100, 0)).await,
            TransferOutcome::Ignored
        );

        release.notify_one();
        assert!(matches!(pending.await.unwrap(), TransferOutcome::Completed(_)));
        assert_eq!(invalidator.keys().len(), 2);
    }
}
