//! Error types for the ledger client library.

use std::time::Duration;

use crate::proposal::{TransactionId, ValidationCode};

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
///
/// Endorsement-level rejections (`EndorsementFailure`, `EndorsementMismatch`)
/// are deliberately distinct from transport-level failures (`Transmission`,
/// `EventService`): a mismatch means the endorsers disagree about the result
/// and retrying the same proposal is unlikely to help, while a transport
/// failure may be transient.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Caller input failed precondition checks; no network call was made.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Peer discovery collaborator failed.
    #[error("peer discovery failed: {0}")]
    Discovery(String),

    /// Endorser selection collaborator failed.
    #[error("endorser selection failed: {0}")]
    Selection(String),

    /// Sending a proposal or transaction to the network failed.
    #[error("transmission failed: {0}")]
    Transmission(String),

    /// An endorser rejected the proposal with a non-success status.
    #[error("endorsement rejected with status {status}: {message}")]
    EndorsementFailure {
        /// Status code returned by the endorser.
        status: u32,
        /// Message returned by the endorser.
        message: String,
    },

    /// Endorsement response payloads do not all match the first response.
    #[error("endorsement response payloads do not match")]
    EndorsementMismatch,

    /// The ledger declined the transaction at commit time.
    #[error("transaction {transaction_id} rejected at commit: {code}")]
    CommitRejected {
        /// Identifier of the rejected transaction.
        transaction_id: TransactionId,
        /// Validation code returned by the ledger.
        code: ValidationCode,
    },

    /// No commit event arrived within the timeout. The outcome is unknown:
    /// the transaction may still commit after this error is returned, so the
    /// transaction id is retained for later correlation.
    #[error("no commit event received for transaction {transaction_id} within {timeout:?}")]
    CommitTimeout {
        /// Identifier of the submitted transaction.
        transaction_id: TransactionId,
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// The query did not produce a result within the timeout. As with
    /// `CommitTimeout` this is an unknown outcome, not a failure: the
    /// dispatched proposal may still complete in the background.
    #[error("query timed out after {0:?}")]
    QueryTimeout(Duration),

    /// An event registration handle of an unrecognized shape was passed to
    /// an unregister entry point.
    #[error("unsupported registration type")]
    UnsupportedRegistration,

    /// The event subscription service failed.
    #[error("event service error: {0}")]
    EventService(String),
}

impl ClientError {
    /// Returns true if this is an endorsement-level rejection rather than a
    /// transport failure.
    pub fn is_endorsement_error(&self) -> bool {
        matches!(
            self,
            ClientError::EndorsementFailure { .. } | ClientError::EndorsementMismatch
        )
    }

    /// Returns true if this is a transport or event-plumbing failure.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            ClientError::Transmission(_) | ClientError::EventService(_)
        )
    }

    /// Returns true if the operation timed out, leaving the outcome unknown.
    ///
    /// A timed-out execute may still commit asynchronously; callers must not
    /// treat this as a definite failure.
    pub fn is_unknown_outcome(&self) -> bool {
        matches!(
            self,
            ClientError::CommitTimeout { .. } | ClientError::QueryTimeout(_)
        )
    }

    /// Returns the transaction id if this error retains one.
    pub fn transaction_id(&self) -> Option<&TransactionId> {
        match self {
            ClientError::CommitRejected { transaction_id, .. }
            | ClientError::CommitTimeout { transaction_id, .. } => Some(transaction_id),
            _ => None,
        }
    }

    /// Returns the ledger validation code if this is a commit rejection.
    pub fn validation_code(&self) -> Option<ValidationCode> {
        match self {
            ClientError::CommitRejected { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_display() {
        let err = ClientError::InvalidRequest("contract_id must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "invalid request: contract_id must not be empty"
        );
    }

    #[test]
    fn test_endorsement_failure_display() {
        let err = ClientError::EndorsementFailure {
            status: 500,
            message: "chaincode panic".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "endorsement rejected with status 500: chaincode panic"
        );
    }

    #[test]
    fn test_is_endorsement_error_true() {
        assert!(ClientError::EndorsementMismatch.is_endorsement_error());
        let err = ClientError::EndorsementFailure {
            status: 403,
            message: "denied".to_string(),
        };
        assert!(err.is_endorsement_error());
    }

    #[test]
    fn test_is_endorsement_error_false_for_transmission() {
        let err = ClientError::Transmission("connection reset".to_string());
        assert!(!err.is_endorsement_error());
    }

    #[test]
    fn test_is_transport_error() {
        assert!(ClientError::Transmission("refused".to_string()).is_transport_error());
        assert!(ClientError::EventService("hub down".to_string()).is_transport_error());
        assert!(!ClientError::EndorsementMismatch.is_transport_error());
    }

    #[test]
    fn test_is_unknown_outcome() {
        let err = ClientError::CommitTimeout {
            transaction_id: TransactionId::generate(),
            timeout: Duration::from_secs(30),
        };
        assert!(err.is_unknown_outcome());
        assert!(ClientError::QueryTimeout(Duration::from_secs(5)).is_unknown_outcome());
        assert!(!ClientError::EndorsementMismatch.is_unknown_outcome());
    }

    #[test]
    fn test_transaction_id_retained_on_commit_rejection() {
        let tx_id = TransactionId::generate();
        let err = ClientError::CommitRejected {
            transaction_id: tx_id.clone(),
            code: ValidationCode::MvccReadConflict,
        };
        assert_eq!(err.transaction_id(), Some(&tx_id));
        assert_eq!(err.validation_code(), Some(ValidationCode::MvccReadConflict));
    }

    #[test]
    fn test_transaction_id_retained_on_commit_timeout() {
        let tx_id = TransactionId::generate();
        let err = ClientError::CommitTimeout {
            transaction_id: tx_id.clone(),
            timeout: Duration::from_secs(180),
        };
        assert_eq!(err.transaction_id(), Some(&tx_id));
        assert_eq!(err.validation_code(), None);
    }

    #[test]
    fn test_transaction_id_absent_elsewhere() {
        assert!(ClientError::EndorsementMismatch.transaction_id().is_none());
    }
}
