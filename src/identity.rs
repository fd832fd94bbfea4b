//! Process-wide local identity provider.
//!
//! The signing identity is shared by every client in the process and is
//! initialized at most once. Initialization failure is unrecoverable: the
//! error is cached and returned to every subsequent caller rather than
//! retried per call.

use std::sync::OnceLock;

use tracing::info;

/// Kind of credential provider backing the local identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// X.509 certificate based identity.
    X509,
    /// Anonymous credential based identity.
    Anonymous,
}

/// The process-local signing identity.
#[derive(Debug)]
pub struct LocalIdentity {
    kind: ProviderKind,
    msp_id: String,
}

impl LocalIdentity {
    /// The provider kind.
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// The membership service provider id this identity belongs to.
    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }
}

/// Local identity initialization failure.
#[derive(Debug, thiserror::Error)]
#[error("failed to initialize local identity: {0}")]
pub struct IdentityError(String);

static LOCAL_IDENTITY: OnceLock<Result<LocalIdentity, IdentityError>> = OnceLock::new();

/// Return the process-wide local identity, initializing it on first use.
///
/// Provider kind comes from `LEDGER_IDENTITY_PROVIDER` (`x509` by default,
/// `anonymous` accepted) and the MSP id from `LEDGER_MSP_ID`. An unknown
/// provider kind fails initialization once, for every caller.
pub fn local_identity() -> Result<&'static LocalIdentity, &'static IdentityError> {
    LOCAL_IDENTITY.get_or_init(init).as_ref()
}

fn init() -> Result<LocalIdentity, IdentityError> {
    let provider = std::env::var("LEDGER_IDENTITY_PROVIDER").unwrap_or_else(|_| "x509".to_string());
    let kind = match provider.as_str() {
        "x509" => ProviderKind::X509,
        "anonymous" => ProviderKind::Anonymous,
        other => return Err(IdentityError(format!("unknown provider kind '{other}'"))),
    };
    let msp_id = std::env::var("LEDGER_MSP_ID").unwrap_or_else(|_| "default".to_string());
    info!(kind = ?kind, msp_id = %msp_id, "initialized local identity");
    Ok(LocalIdentity { kind, msp_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_instance_returned() {
        let first = local_identity().expect("default identity initializes");
        let second = local_identity().expect("default identity initializes");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_default_provider_is_x509() {
        let identity = local_identity().expect("default identity initializes");
        assert_eq!(identity.kind(), ProviderKind::X509);
        assert!(!identity.msp_id().is_empty());
    }
}
