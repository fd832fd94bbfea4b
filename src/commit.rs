//! Commit wait: submits an endorsed transaction for ordering and awaits the
//! ledger's verdict.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::proposal::{EndorsementResponse, ExecuteResponse, TransactionId};
use crate::traits::{EventService, ProposalSender};

/// Submit an endorsed transaction and wait for its commit verdict.
///
/// Registers commit-event interest before submitting, so a verdict arriving
/// immediately after submission cannot be missed. Produces exactly one
/// outcome:
///
/// - the verdict arrives and is `Valid` — success;
/// - the verdict arrives and is anything else — [`ClientError::CommitRejected`];
/// - the timer wins — [`ClientError::CommitTimeout`]; the transaction may
///   still commit later, the outcome is unknown.
///
/// The commit registration is not torn down here; releasing event
/// subscriptions is the client's shutdown concern.
pub(crate) async fn submit_and_wait(
    sender: Arc<dyn ProposalSender>,
    events: Arc<dyn EventService>,
    tx_id: TransactionId,
    responses: Vec<EndorsementResponse>,
    timeout: Duration,
) -> Result<ExecuteResponse> {
    if !events.is_connected() {
        events
            .connect()
            .await
            .map_err(|e| ClientError::EventService(format!("connect failed: {e}")))?;
    }

    // Registration must precede submission to close the race window between
    // the transaction entering ordering and its verdict being published.
    let (_registration, verdict) = events.register_commit_event(&tx_id).await;

    sender.submit_transaction(&tx_id, &responses).await?;
    debug!(tx_id = %tx_id, "transaction submitted, awaiting commit event");

    match tokio::time::timeout(timeout, verdict).await {
        Ok(Ok(code)) if code.is_valid() => {
            info!(tx_id = %tx_id, code = %code, "transaction committed");
            Ok(ExecuteResponse {
                transaction_id: tx_id,
                validation_code: code,
            })
        }
        Ok(Ok(code)) => {
            warn!(tx_id = %tx_id, code = %code, "transaction rejected at commit");
            Err(ClientError::CommitRejected {
                transaction_id: tx_id,
                code,
            })
        }
        Ok(Err(_)) => Err(ClientError::EventService(format!(
            "commit event source closed before a verdict for {tx_id}"
        ))),
        Err(_) => {
            warn!(tx_id = %tx_id, ?timeout, "no commit event within timeout, outcome unknown");
            Err(ClientError::CommitTimeout {
                transaction_id: tx_id,
                timeout,
            })
        }
    }
}
