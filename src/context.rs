use crate::error::BrokerError;
use crate::model::Account;

/// Read-only session scope threaded through every broker operation.
/// Nothing here is mutated after construction; all mutable trading state
/// lives in the remote backend.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub account: Account,
    pub user_id: String,
    pub competition_id: Option<String>,
}

impl SessionContext {
    pub fn new(
        account: Account,
        user_id: impl Into<String>,
        competition_id: Option<String>,
    ) -> Self {
        SessionContext {
            account,
            user_id: user_id.into(),
            competition_id,
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account.id
    }

    /// Mutating operations are scoped to a competition; fail fast when the
    /// scope is absent instead of letting the backend reject the call.
    pub fn require_competition(&self) -> Result<&str, BrokerError> {
        self.competition_id.as_deref().ok_or_else(|| {
            BrokerError::Validation("no competition scope bound to this session".to_string())
        })
    }
}
