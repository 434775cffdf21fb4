pub mod http;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BrokerError;
use crate::model::{Instrument, OrderType, PositionSnapshot, Side};

/// Body of the bracket-update remote procedure.
/// Absent fields mean "leave unchanged" and are omitted from the wire.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BracketUpdate {
    pub position_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
}

/// Body of the place-order remote procedure.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderTicket {
    pub competition_id: String,
    pub instrument_id: String,
    pub side: Side,
    pub quantity: Decimal,
    pub leverage: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_price: Option<Decimal>,
    pub create_new_position: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountBalance {
    pub balance: Decimal,
    pub equity: Decimal,
}

/// The backend that owns accounts, positions and orders. The adapter only
/// requests transitions through this seam; it never mutates state locally.
#[async_trait]
pub trait RemoteTradingService: Send + Sync {
    /// Edit the stop-loss/take-profit pair on an open position.
    async fn update_position_brackets(&self, update: BracketUpdate) -> Result<(), BrokerError>;

    /// Close an open position within a competition scope.
    async fn close_position(
        &self,
        position_id: &str,
        competition_id: &str,
    ) -> Result<(), BrokerError>;

    /// Submit a new order; returns the backend order id.
    async fn place_order(&self, ticket: OrderTicket) -> Result<String, BrokerError>;

    /// Read one position filtered by id AND account id. A row belonging to
    /// another account must surface as `NotFound`, never leak.
    async fn get_position(
        &self,
        position_id: &str,
        account_id: &str,
    ) -> Result<PositionSnapshot, BrokerError>;

    /// Instrument reference data by symbol.
    async fn get_instrument(&self, symbol: &str) -> Result<Instrument, BrokerError>;

    /// All open positions for an account.
    async fn open_positions(&self, account_id: &str) -> Result<Vec<PositionSnapshot>, BrokerError>;

    /// Balance and equity of an account.
    async fn account_balance(&self, account_id: &str) -> Result<AccountBalance, BrokerError>;
}
