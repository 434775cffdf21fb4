use serde::Serialize;
use tracing::debug;

use crate::config::ConfigFlags;
use crate::error::BrokerError;
use crate::model::{Account, ConnectionStatus, Execution, PositionAction};
use crate::remote::AccountBalance;

use super::Broker;

/// The fixed capability set advertised for every position. This is a static
/// declaration consumed by the host's UI, not a live permission check: it
/// does not vary with the position's state or existence.
pub const POSITION_ACTIONS: [PositionAction; 5] = [
    PositionAction::EditStopLoss,
    PositionAction::EditTakeProfit,
    PositionAction::EditPosition,
    PositionAction::ClosePosition,
    PositionAction::ReversePosition,
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccountManagerInfo {
    pub account_title: String,
    pub pages: Vec<AccountPage>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccountPage {
    pub id: String,
    pub title: String,
    pub tables: Vec<String>,
}

/// Discovery queries the host polls to decide which UI affordances to
/// render. All of these are pure reads with no side effects beyond logging.
impl Broker {
    pub fn connection_status(&self) -> ConnectionStatus {
        ConnectionStatus::Connected
    }

    pub fn current_account(&self) -> &str {
        self.ctx.account_id()
    }

    /// Every symbol known to the instrument universe is tradable; there is
    /// no blacklist in the adapter.
    pub async fn is_tradable(&self, symbol: &str) -> bool {
        debug!(symbol, "is_tradable");
        true
    }

    pub fn supports_brackets(&self) -> bool {
        true
    }

    pub async fn position_actions(&self, position_id: &str) -> Vec<PositionAction> {
        debug!(position_id, "position_actions");
        POSITION_ACTIONS.to_vec()
    }

    /// Exactly one account: the one this session is bound to.
    pub async fn accounts_metainfo(&self) -> Vec<Account> {
        vec![self.ctx.account.clone()]
    }

    /// Execution history is out of scope; an empty list is the normal
    /// answer, not an error.
    pub async fn executions(&self, symbol: &str) -> Vec<Execution> {
        debug!(symbol, "executions");
        Vec::new()
    }

    pub fn config_flags(&self) -> &ConfigFlags {
        &self.flags
    }

    pub fn account_manager_info(&self) -> AccountManagerInfo {
        AccountManagerInfo {
            account_title: self.ctx.account.name.clone(),
            pages: vec![AccountPage {
                id: "accountsummary".to_string(),
                title: "Account Summary".to_string(),
                tables: Vec::new(),
            }],
        }
    }

    /// Balance/equity for the account summary page.
    pub async fn account_balance(&self) -> Result<AccountBalance, BrokerError> {
        self.remote.account_balance(self.ctx.account_id()).await
    }
}
