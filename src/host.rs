use tracing::{debug, error, info};

/// Structured outcome of a broker operation. Business methods emit these on
/// the host channel; a presentation layer decides how to render them
/// (toast, log line, status bar). The core never formats UI text inline.
#[derive(Debug, Clone, PartialEq)]
pub enum BrokerEvent {
    BracketsUpdated {
        position_id: String,
    },
    OrderPlaced {
        order_id: String,
    },
    PositionClosed {
        position_id: String,
    },
    PositionReversed {
        position_id: String,
    },
    /// A reversal closed the position but could not reopen the opposite
    /// side. The position stays closed; no rollback is attempted.
    ReversalAbandoned {
        position_id: String,
        message: String,
    },
    OperationFailed {
        operation: &'static str,
        message: String,
    },
    Info {
        message: String,
    },
}

/// The charting front end's callbacks, as seen from the adapter.
pub trait HostHandle: Send + Sync {
    /// Ask the host to re-read positions (its `positionUpdate` hook).
    fn refresh_positions(&self);

    /// Report a structured outcome.
    fn emit(&self, event: BrokerEvent);

    /// Open the host's modify-position dialog. Returns false when the host
    /// does not provide one.
    fn open_modify_dialog(&self, position_id: &str) -> bool {
        let _ = position_id;
        false
    }

    /// Fallback channel when no dialog is available: raise a custom UI event
    /// the surrounding page can listen for.
    fn dispatch_ui_event(&self, name: &str, position_id: &str) {
        let _ = (name, position_id);
    }
}

/// Renders outcome events through `tracing`. Used where no interactive host
/// is attached, e.g. behind the HTTP surface.
pub struct LoggingHost;

impl HostHandle for LoggingHost {
    fn refresh_positions(&self) {
        debug!("host refresh requested");
    }

    fn emit(&self, event: BrokerEvent) {
        match event {
            BrokerEvent::BracketsUpdated { position_id } => {
                info!(position_id = %position_id, "brackets updated");
            }
            BrokerEvent::OrderPlaced { order_id } => {
                info!(order_id = %order_id, "order placed");
            }
            BrokerEvent::PositionClosed { position_id } => {
                info!(position_id = %position_id, "position closed");
            }
            BrokerEvent::PositionReversed { position_id } => {
                info!(position_id = %position_id, "position reversed");
            }
            BrokerEvent::ReversalAbandoned {
                position_id,
                message,
            } => {
                error!(
                    position_id = %position_id,
                    message = %message,
                    "position closed but not reopened"
                );
            }
            BrokerEvent::OperationFailed { operation, message } => {
                error!(operation, message = %message, "operation failed");
            }
            BrokerEvent::Info { message } => {
                info!(message = %message, "notice");
            }
        }
    }
}
