use tracing::{error, info};

use crate::error::BrokerError;
use crate::host::BrokerEvent;
use crate::model::Brackets;
use crate::remote::BracketUpdate;

use super::Broker;

impl Broker {
    /// Edit the stop-loss/take-profit pair on an open position.
    ///
    /// `None` fields are forwarded as "leave unchanged", never coerced to a
    /// default. On success the host is asked to refresh exactly once; on
    /// failure an outcome event is emitted and the error rethrown so
    /// composing operations abort.
    pub async fn edit_position_brackets(
        &self,
        position_id: &str,
        brackets: Brackets,
    ) -> Result<(), BrokerError> {
        let _lease = self.lease(position_id).await;
        info!(
            position_id,
            stop_loss = ?brackets.stop_loss,
            take_profit = ?brackets.take_profit,
            "edit_position_brackets"
        );

        let update = BracketUpdate {
            position_id: position_id.to_string(),
            stop_loss: brackets.stop_loss,
            take_profit: brackets.take_profit,
        };

        match self.remote.update_position_brackets(update).await {
            Ok(()) => {
                self.host.emit(BrokerEvent::BracketsUpdated {
                    position_id: position_id.to_string(),
                });
                self.host.refresh_positions();
                Ok(())
            }
            Err(e) => {
                error!(position_id, error = %e, "edit_position_brackets failed");
                self.host.emit(BrokerEvent::OperationFailed {
                    operation: "edit_position_brackets",
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Convenience entry point for the host's generic modify payload. Both
    /// fields are forwarded as-is, including `None`.
    pub async fn modify_position(
        &self,
        position_id: &str,
        brackets: Brackets,
    ) -> Result<(), BrokerError> {
        self.edit_position_brackets(position_id, brackets).await
    }
}
