use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Side {
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "sell")]
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderType {
    #[serde(rename = "market")]
    Market,
    #[serde(rename = "limit")]
    Limit,
    #[serde(rename = "stop")]
    Stop,
    #[serde(rename = "stop_limit")]
    StopLimit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Disconnected,
    Error,
}

/// The trading account the adapter is bound to. Owned by the remote backend
/// and immutable for the adapter's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub currency: String,
}

/// Read-only instrument reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub leverage_default: Option<u32>,
    #[serde(default)]
    pub contract_size: Option<Decimal>,
}

/// A position as read from the remote backend. The adapter never creates or
/// deletes these directly; it only requests transitions remotely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionSnapshot {
    pub id: String,
    pub account_id: String,
    pub instrument: Instrument,
    pub side: Side,
    pub quantity: Decimal,
    #[serde(default)]
    pub stop_loss: Option<Decimal>,
    #[serde(default)]
    pub take_profit: Option<Decimal>,
}

/// The stop-loss/take-profit pair attached to a position.
/// `None` means "leave unchanged", never "clear".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Brackets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
}

/// An order request as handed over by the host. Transient: submitted and
/// forgotten; a fill surfaces later as a position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreOrder {
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    pub qty: Decimal,
    #[serde(default)]
    pub limit_price: Option<Decimal>,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub stop_loss: Option<Decimal>,
    #[serde(default)]
    pub take_profit: Option<Decimal>,
    #[serde(default)]
    pub leverage: Option<u32>,
    #[serde(default)]
    pub is_close: bool,
}

impl PreOrder {
    /// Plain market order with no brackets. Reversal reopens through this.
    pub fn market(symbol: impl Into<String>, side: Side, qty: Decimal) -> Self {
        PreOrder {
            symbol: symbol.into(),
            order_type: OrderType::Market,
            side,
            qty,
            limit_price: None,
            stop_price: None,
            stop_loss: None,
            take_profit: None,
            leverage: None,
            is_close: false,
        }
    }
}

/// Capability tags the host polls per position to decide which UI
/// affordances to render.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PositionAction {
    #[serde(rename = "editStopLoss")]
    EditStopLoss,
    #[serde(rename = "editTakeProfit")]
    EditTakeProfit,
    #[serde(rename = "editPosition")]
    EditPosition,
    #[serde(rename = "closePosition")]
    ClosePosition,
    #[serde(rename = "reversePosition")]
    ReversePosition,
}

/// Execution history entry. The adapter never reports any; the shape exists
/// only to satisfy the host contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Execution {
    pub symbol: String,
    pub side: Side,
    pub qty: Decimal,
    pub price: Decimal,
    pub time: DateTime<Utc>,
}
