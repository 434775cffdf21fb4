use std::time::Duration;
use tracing::{error, info, warn};

use crate::error::BrokerError;
use crate::host::BrokerEvent;
use crate::model::{PositionSnapshot, PreOrder};

use super::Broker;

impl Broker {
    /// All open positions for the bound account.
    pub async fn positions(&self) -> Result<Vec<PositionSnapshot>, BrokerError> {
        self.remote.open_positions(self.ctx.account_id()).await
    }

    /// Close an open position at market.
    pub async fn close_position(&self, position_id: &str) -> Result<(), BrokerError> {
        let _lease = self.lease(position_id).await;

        match self.request_close(position_id).await {
            Ok(()) => {
                self.host.emit(BrokerEvent::PositionClosed {
                    position_id: position_id.to_string(),
                });
                self.host.refresh_positions();
                Ok(())
            }
            Err(e) => {
                error!(position_id, error = %e, "close_position failed");
                self.host.emit(BrokerEvent::OperationFailed {
                    operation: "close_position",
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Issue the close without taking the lease or notifying the host.
    /// Reversal holds the lease across its whole sequence, calls in here
    /// directly, and reports a single outcome for the composed operation.
    async fn request_close(&self, position_id: &str) -> Result<(), BrokerError> {
        info!(position_id, "close_position");
        let competition_id = self.ctx.require_competition()?;
        self.remote.close_position(position_id, competition_id).await
    }

    /// Close an open position and immediately open the opposite side with
    /// the same absolute quantity.
    ///
    /// There is no compensating transaction: if the close succeeds and the
    /// reopen fails, the position stays closed and the failure says so
    /// distinctly (`ReversalAbandoned`).
    pub async fn reverse_position(&self, position_id: &str) -> Result<(), BrokerError> {
        let _lease = self.lease(position_id).await;
        info!(position_id, "reverse_position");

        // Fail fast before touching the backend.
        self.ctx.require_competition()?;

        // Read side, quantity and instrument, scoped to the bound account.
        // A row under another account surfaces as NotFound and nothing below
        // runs.
        let snapshot = match self
            .remote
            .get_position(position_id, self.ctx.account_id())
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(position_id, error = %e, "reverse_position: read failed");
                self.host.emit(BrokerEvent::OperationFailed {
                    operation: "reverse_position",
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        // The reopen order resolves the instrument by symbol; seed the cache
        // from the row we already have.
        self.instruments.insert(
            snapshot.instrument.symbol.clone(),
            snapshot.instrument.clone(),
        );

        if let Err(e) = self.request_close(position_id).await {
            error!(position_id, error = %e, "reverse_position: close failed");
            self.host.emit(BrokerEvent::OperationFailed {
                operation: "reverse_position",
                message: e.to_string(),
            });
            return Err(e);
        }

        self.await_close_settlement(position_id).await;

        let reopen = PreOrder::market(
            snapshot.instrument.symbol.clone(),
            snapshot.side.opposite(),
            snapshot.quantity.abs(),
        );

        // The inner paths stay silent so the host sees exactly one refresh
        // and one outcome for the whole reversal.
        match self.submit_order(reopen).await {
            Ok(_) => {
                self.host.emit(BrokerEvent::PositionReversed {
                    position_id: position_id.to_string(),
                });
                self.host.refresh_positions();
                Ok(())
            }
            Err(e) => {
                error!(position_id, error = %e, "reverse_position: reopen failed after close");
                self.host.emit(BrokerEvent::ReversalAbandoned {
                    position_id: position_id.to_string(),
                    message: e.to_string(),
                });
                // The close did land; the host still needs to drop the row.
                self.host.refresh_positions();
                Err(e)
            }
        }
    }

    /// Wait for the backend to finalize a close before reopening. The read
    /// path is polled until the row disappears; if it is still visible when
    /// the poll budget runs out, fall back to a fixed delay. The fallback is
    /// a heuristic, not a completion signal.
    async fn await_close_settlement(&self, position_id: &str) {
        for _ in 0..self.settlement.max_polls {
            match self
                .remote
                .get_position(position_id, self.ctx.account_id())
                .await
            {
                // Row gone: close confirmed.
                Err(BrokerError::NotFound(_)) => return,
                // Still visible, or a transient read failure: keep polling.
                Ok(_) | Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(self.settlement.poll_interval_ms)).await;
        }

        warn!(
            position_id,
            delay_ms = self.settlement.fallback_delay_ms,
            "close not confirmed within poll budget, falling back to fixed settlement delay"
        );
        tokio::time::sleep(Duration::from_millis(self.settlement.fallback_delay_ms)).await;
    }
}
