use rust_decimal::Decimal;
use tracing::{error, info};

use crate::error::BrokerError;
use crate::host::BrokerEvent;
use crate::model::{Instrument, PreOrder};
use crate::remote::OrderTicket;

use super::Broker;

const DEFAULT_LEVERAGE: u32 = 10;

impl Broker {
    /// Submit a new order. Only shape is checked locally (positive quantity,
    /// bound competition scope); margin and risk limits are owned by the
    /// backend and its failure surfaces verbatim.
    pub async fn place_order(&self, pre_order: PreOrder) -> Result<String, BrokerError> {
        let symbol = pre_order.symbol.clone();
        match self.submit_order(pre_order).await {
            Ok(order_id) => {
                self.host.emit(BrokerEvent::OrderPlaced {
                    order_id: order_id.clone(),
                });
                self.host.refresh_positions();
                Ok(order_id)
            }
            Err(e) => {
                error!(symbol = %symbol, error = %e, "place_order failed");
                self.host.emit(BrokerEvent::OperationFailed {
                    operation: "place_order",
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Validate, resolve the instrument and submit, without notifying the
    /// host. Reversal composes this and reports a single outcome for the
    /// whole sequence.
    pub(crate) async fn submit_order(&self, pre_order: PreOrder) -> Result<String, BrokerError> {
        info!(
            symbol = %pre_order.symbol,
            side = ?pre_order.side,
            order_type = ?pre_order.order_type,
            qty = %pre_order.qty,
            "place_order"
        );

        let competition_id = self.ctx.require_competition()?;
        if pre_order.qty <= Decimal::ZERO {
            return Err(BrokerError::Validation(format!(
                "order quantity must be positive, got {}",
                pre_order.qty
            )));
        }

        let instrument = self.instrument(&pre_order.symbol).await?;
        let leverage = pre_order
            .leverage
            .or(instrument.leverage_default)
            .unwrap_or(DEFAULT_LEVERAGE);

        let ticket = OrderTicket {
            competition_id: competition_id.to_string(),
            instrument_id: instrument.id,
            side: pre_order.side,
            quantity: pre_order.qty,
            leverage,
            stop_loss: pre_order.stop_loss,
            take_profit: pre_order.take_profit,
            order_type: pre_order.order_type,
            requested_price: pre_order.limit_price.or(pre_order.stop_price),
            create_new_position: !pre_order.is_close,
        };

        self.remote.place_order(ticket).await
    }

    /// Instrument rows are immutable reference data; look each symbol up
    /// once and cache it.
    pub(crate) async fn instrument(&self, symbol: &str) -> Result<Instrument, BrokerError> {
        if let Some(hit) = self.instruments.get(symbol) {
            return Ok(hit.clone());
        }
        let instrument = self.remote.get_instrument(symbol).await?;
        self.instruments
            .insert(symbol.to_string(), instrument.clone());
        Ok(instrument)
    }
}
