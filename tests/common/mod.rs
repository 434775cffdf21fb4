//! Shared test doubles: a recording remote backend and a recording host.

#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use arena_broker_rs::broker::Broker;
use arena_broker_rs::config::{ConfigFlags, SettlementConfig};
use arena_broker_rs::context::SessionContext;
use arena_broker_rs::error::BrokerError;
use arena_broker_rs::host::{BrokerEvent, HostHandle};
use arena_broker_rs::model::{Account, Instrument, PositionSnapshot, Side};
use arena_broker_rs::remote::{AccountBalance, BracketUpdate, OrderTicket, RemoteTradingService};

pub const ACCOUNT_ID: &str = "acct-1";
pub const COMPETITION_ID: &str = "comp-1";

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    UpdateBrackets(BracketUpdate),
    ClosePosition {
        position_id: String,
        competition_id: String,
    },
    PlaceOrder(OrderTicket),
    GetPosition {
        position_id: String,
        account_id: String,
    },
    GetInstrument(String),
}

/// In-memory stand-in for the remote backend. Records every call and can be
/// scripted to fail a given procedure.
#[derive(Default)]
pub struct FakeRemote {
    pub calls: Mutex<Vec<RemoteCall>>,
    pub positions: Mutex<HashMap<String, PositionSnapshot>>,
    pub instruments: Mutex<HashMap<String, Instrument>>,
    pub fail_update_brackets: Option<String>,
    pub fail_close: Option<String>,
    pub fail_place_order: Option<String>,
}

impl FakeRemote {
    pub fn with_position(self, position: PositionSnapshot) -> Self {
        self.instruments.lock().unwrap().insert(
            position.instrument.symbol.clone(),
            position.instrument.clone(),
        );
        self.positions
            .lock()
            .unwrap()
            .insert(position.id.clone(), position);
        self
    }

    pub fn with_instrument(self, instrument: Instrument) -> Self {
        self.instruments
            .lock()
            .unwrap()
            .insert(instrument.symbol.clone(), instrument);
        self
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteTradingService for FakeRemote {
    async fn update_position_brackets(&self, update: BracketUpdate) -> Result<(), BrokerError> {
        self.record(RemoteCall::UpdateBrackets(update));
        if let Some(msg) = &self.fail_update_brackets {
            return Err(BrokerError::Remote(msg.clone()));
        }
        Ok(())
    }

    async fn close_position(
        &self,
        position_id: &str,
        competition_id: &str,
    ) -> Result<(), BrokerError> {
        self.record(RemoteCall::ClosePosition {
            position_id: position_id.to_string(),
            competition_id: competition_id.to_string(),
        });
        if let Some(msg) = &self.fail_close {
            return Err(BrokerError::Remote(msg.clone()));
        }
        self.positions.lock().unwrap().remove(position_id);
        Ok(())
    }

    async fn place_order(&self, ticket: OrderTicket) -> Result<String, BrokerError> {
        self.record(RemoteCall::PlaceOrder(ticket));
        if let Some(msg) = &self.fail_place_order {
            return Err(BrokerError::Remote(msg.clone()));
        }
        Ok("order-1".to_string())
    }

    async fn get_position(
        &self,
        position_id: &str,
        account_id: &str,
    ) -> Result<PositionSnapshot, BrokerError> {
        self.record(RemoteCall::GetPosition {
            position_id: position_id.to_string(),
            account_id: account_id.to_string(),
        });
        // The backend filters by id AND account id: a row under another
        // account is indistinguishable from a missing row.
        self.positions
            .lock()
            .unwrap()
            .get(position_id)
            .filter(|p| p.account_id == account_id)
            .cloned()
            .ok_or_else(|| BrokerError::NotFound(format!("position {} not found", position_id)))
    }

    async fn get_instrument(&self, symbol: &str) -> Result<Instrument, BrokerError> {
        self.record(RemoteCall::GetInstrument(symbol.to_string()));
        self.instruments
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| BrokerError::NotFound(format!("instrument {} not found", symbol)))
    }

    async fn open_positions(&self, account_id: &str) -> Result<Vec<PositionSnapshot>, BrokerError> {
        Ok(self
            .positions
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn account_balance(&self, _account_id: &str) -> Result<AccountBalance, BrokerError> {
        Ok(AccountBalance {
            balance: dec!(10000),
            equity: dec!(10000),
        })
    }
}

/// Host double: counts refreshes, records outcome events, and can pretend to
/// own a modify-position dialog.
#[derive(Default)]
pub struct RecordingHost {
    pub refreshes: AtomicUsize,
    pub events: Mutex<Vec<BrokerEvent>>,
    pub dialog_available: bool,
    pub dialogs: Mutex<Vec<String>>,
    pub ui_events: Mutex<Vec<(String, String)>>,
}

impl RecordingHost {
    pub fn with_dialog() -> Self {
        RecordingHost {
            dialog_available: true,
            ..RecordingHost::default()
        }
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<BrokerEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl HostHandle for RecordingHost {
    fn refresh_positions(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn emit(&self, event: BrokerEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn open_modify_dialog(&self, position_id: &str) -> bool {
        if self.dialog_available {
            self.dialogs.lock().unwrap().push(position_id.to_string());
        }
        self.dialog_available
    }

    fn dispatch_ui_event(&self, name: &str, position_id: &str) {
        self.ui_events
            .lock()
            .unwrap()
            .push((name.to_string(), position_id.to_string()));
    }
}

pub fn instrument(id: &str, symbol: &str) -> Instrument {
    Instrument {
        id: id.to_string(),
        symbol: symbol.to_string(),
        leverage_default: Some(10),
        contract_size: Some(dec!(1)),
    }
}

pub fn open_position(
    id: &str,
    account_id: &str,
    symbol: &str,
    side: Side,
    quantity: Decimal,
) -> PositionSnapshot {
    PositionSnapshot {
        id: id.to_string(),
        account_id: account_id.to_string(),
        instrument: instrument(&format!("inst-{}", symbol), symbol),
        side,
        quantity,
        stop_loss: None,
        take_profit: None,
    }
}

/// Settlement tuned for tests: confirmation polls run instantly and the
/// fallback delay is zero.
pub fn fast_settlement() -> SettlementConfig {
    SettlementConfig {
        poll_interval_ms: 0,
        max_polls: 3,
        fallback_delay_ms: 0,
    }
}

pub fn broker_with(
    remote: std::sync::Arc<FakeRemote>,
    host: std::sync::Arc<RecordingHost>,
    competition_id: Option<&str>,
) -> Broker {
    let account = Account {
        id: ACCOUNT_ID.to_string(),
        name: "TradeArena Trading Account".to_string(),
        currency: "USD".to_string(),
    };
    let ctx = SessionContext::new(account, "user-1", competition_id.map(str::to_string));
    Broker::new(
        remote,
        host,
        ctx,
        ConfigFlags::default(),
        fast_settlement(),
    )
}
