//! Proposal requests, transaction identifiers, and endorsement responses.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::error::{ClientError, Result};

/// Status code an endorser returns for a successful simulation.
pub const ENDORSEMENT_SUCCESS_STATUS: u32 = 200;

/// A request to invoke a contract function, sent to endorsers for approval
/// before ordering.
#[derive(Debug, Clone, Default)]
pub struct ProposalRequest {
    /// Identifier of the target contract.
    pub contract_id: String,
    /// Name of the function to invoke.
    pub function: String,
    /// Ordered invocation arguments.
    pub args: Vec<Vec<u8>>,
    /// Transient data passed to endorsers but never written to the ledger.
    pub transient: HashMap<String, Vec<u8>>,
}

impl ProposalRequest {
    /// Create a request for the given contract and function.
    pub fn new(contract_id: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            function: function.into(),
            args: Vec::new(),
            transient: HashMap::new(),
        }
    }

    /// Append an invocation argument.
    pub fn with_arg(mut self, arg: impl Into<Vec<u8>>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Replace the invocation arguments.
    pub fn with_args(mut self, args: Vec<Vec<u8>>) -> Self {
        self.args = args;
        self
    }

    /// Attach a transient data entry.
    pub fn with_transient(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.transient.insert(key.into(), value.into());
        self
    }

    /// Check request preconditions. Runs before any network activity.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.contract_id.is_empty() {
            return Err(ClientError::InvalidRequest(
                "contract_id must not be empty".to_string(),
            ));
        }
        if self.function.is_empty() {
            return Err(ClientError::InvalidRequest(
                "function must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Opaque transaction identifier, unique per submitted transaction.
///
/// Generated before any network call so that commit events can be correlated
/// back to the originating request even if the submitting call times out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque handle to a remote endorsing node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    /// Peer identifier.
    pub name: String,
    /// Network endpoint (host:port).
    pub endpoint: String,
}

impl Peer {
    /// Create a peer handle.
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// One endorser's response to a proposal: its simulated execution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndorsementResponse {
    /// Status code; `ENDORSEMENT_SUCCESS_STATUS` on success.
    pub status: u32,
    /// Simulated execution result payload.
    pub payload: Vec<u8>,
    /// Human-readable message, populated on failure.
    pub message: String,
}

impl EndorsementResponse {
    /// A successful response carrying the given payload.
    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status: ENDORSEMENT_SUCCESS_STATUS,
            payload: payload.into(),
            message: String::new(),
        }
    }

    /// A failed response with the given status and message.
    pub fn failure(status: u32, message: impl Into<String>) -> Self {
        Self {
            status,
            payload: Vec::new(),
            message: message.into(),
        }
    }
}

/// The ledger's final verdict on whether an endorsed transaction was
/// accepted into the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    /// The transaction was committed.
    Valid,
    /// The transaction envelope could not be decoded.
    BadPayload,
    /// The endorsements did not satisfy the endorsement policy.
    EndorsementPolicyFailure,
    /// A key read by the transaction was modified by an earlier transaction
    /// in the same block.
    MvccReadConflict,
    /// A range read by the transaction changed between simulation and commit.
    PhantomReadConflict,
    /// The transaction arrived after its validity window closed.
    Expired,
    /// Rejected for a reason outside the categories above.
    InvalidOther,
}

impl ValidationCode {
    /// Returns true if this code means the transaction committed.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationCode::Valid)
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationCode::Valid => "VALID",
            ValidationCode::BadPayload => "BAD_PAYLOAD",
            ValidationCode::EndorsementPolicyFailure => "ENDORSEMENT_POLICY_FAILURE",
            ValidationCode::MvccReadConflict => "MVCC_READ_CONFLICT",
            ValidationCode::PhantomReadConflict => "PHANTOM_READ_CONFLICT",
            ValidationCode::Expired => "EXPIRED",
            ValidationCode::InvalidOther => "INVALID_OTHER",
        };
        f.write_str(name)
    }
}

/// Terminal result of a successful transaction execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteResponse {
    /// Identifier of the committed transaction.
    pub transaction_id: TransactionId,
    /// Validation code reported by the ledger.
    pub validation_code: ValidationCode,
}

/// A contract-emitted event delivered through an event registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractEvent {
    /// Contract that emitted the event.
    pub contract_id: String,
    /// Name of the event.
    pub event_name: String,
    /// Transaction that produced the event.
    pub transaction_id: TransactionId,
    /// Event payload.
    pub payload: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ProposalRequest::new("asset", "transfer")
            .with_arg("from")
            .with_arg("to")
            .with_transient("secret", vec![1, 2, 3]);
        assert_eq!(request.contract_id, "asset");
        assert_eq!(request.function, "transfer");
        assert_eq!(request.args.len(), 2);
        assert_eq!(request.transient.get("secret"), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_validate_passes() {
        assert!(ProposalRequest::new("asset", "read").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_contract_id() {
        let err = ProposalRequest::new("", "read").validate().unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_validate_rejects_empty_function() {
        let err = ProposalRequest::new("asset", "").validate().unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_transaction_ids_are_unique() {
        let a = TransactionId::generate();
        let b = TransactionId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_validation_code_display() {
        assert_eq!(ValidationCode::Valid.to_string(), "VALID");
        assert_eq!(
            ValidationCode::MvccReadConflict.to_string(),
            "MVCC_READ_CONFLICT"
        );
    }

    #[test]
    fn test_validation_code_is_valid() {
        assert!(ValidationCode::Valid.is_valid());
        assert!(!ValidationCode::Expired.is_valid());
    }

    #[test]
    fn test_endorsement_response_constructors() {
        let ok = EndorsementResponse::success(vec![7]);
        assert_eq!(ok.status, ENDORSEMENT_SUCCESS_STATUS);
        let bad = EndorsementResponse::failure(500, "boom");
        assert_eq!(bad.status, 500);
        assert_eq!(bad.message, "boom");
    }
}
