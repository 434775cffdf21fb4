use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use tracing::debug;
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::error::BrokerError;
use crate::model::{Instrument, PositionSnapshot, Side};
use crate::remote::{AccountBalance, BracketUpdate, OrderTicket, RemoteTradingService};

const POSITION_SELECT: &str =
    "id,side,quantity,stop_loss,take_profit,instrument:instruments!inner(id,symbol,leverage_default,contract_size)";

/// HTTP client for the remote trading backend. Mutations go through function
/// endpoints, reads through the queryable REST store.
pub struct HttpRemote {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpRemote {
    pub fn new(config: Option<&BackendConfig>) -> Result<Self, BrokerError> {
        let base_url = config
            .and_then(|c| c.base_url.clone())
            .or_else(|| env::var("ARENA_BACKEND_URL").ok())
            .ok_or_else(|| {
                BrokerError::Validation(
                    "ARENA_BACKEND_URL not set (check config or env)".to_string(),
                )
            })?;

        let api_key = config
            .and_then(|c| c.api_key.clone())
            .or_else(|| env::var("ARENA_API_KEY").ok())
            .ok_or_else(|| {
                BrokerError::Validation("ARENA_API_KEY not set (check config or env)".to_string())
            })?;

        Ok(HttpRemote {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
        })
    }

    /// POST a mutation function and unwrap its envelope.
    async fn invoke_function(
        &self,
        name: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, BrokerError> {
        let url = format!("{}/functions/v1/{}", self.base_url, name);
        debug!(function = name, "invoking remote function");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(BrokerError::Remote(format!(
                "{} failed {}: {}",
                name, status, text
            )));
        }

        parse_envelope(name, &text)
    }

    /// GET rows from the read store.
    async fn select(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, BrokerError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);

        let resp = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(BrokerError::Remote(format!(
                "{} read failed {}: {}",
                table, status, text
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| BrokerError::Remote(format!("{}: malformed response: {}", table, e)))
    }
}

/// The backend reports business failures inside a 2xx envelope: either a
/// top-level `error` or one nested under `data`. The value may be a plain
/// string or an object like `{"message": ...}`; any present, non-null value
/// is a failure and must surface identically to a transport error. Only
/// `error: null` counts as success.
pub(crate) fn parse_envelope(name: &str, text: &str) -> Result<serde_json::Value, BrokerError> {
    let json: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| BrokerError::Remote(format!("{}: malformed response: {}", name, e)))?;

    let embedded = [json.get("error"), json.pointer("/data/error")]
        .into_iter()
        .flatten()
        .find(|v| !v.is_null());
    if let Some(err) = embedded {
        let message = match err.as_str() {
            Some(s) => s.to_string(),
            None => err.to_string(),
        };
        return Err(BrokerError::Remote(format!("{}: {}", name, message)));
    }

    Ok(json)
}

#[derive(Debug, Deserialize)]
struct PositionRow {
    id: String,
    side: Side,
    quantity: Decimal,
    #[serde(default)]
    stop_loss: Option<Decimal>,
    #[serde(default)]
    take_profit: Option<Decimal>,
    instrument: Instrument,
}

impl PositionRow {
    fn into_snapshot(self, account_id: &str) -> PositionSnapshot {
        PositionSnapshot {
            id: self.id,
            account_id: account_id.to_string(),
            instrument: self.instrument,
            side: self.side,
            quantity: self.quantity.abs(),
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
        }
    }
}

#[async_trait]
impl RemoteTradingService for HttpRemote {
    async fn update_position_brackets(&self, update: BracketUpdate) -> Result<(), BrokerError> {
        let body = serde_json::to_value(&update)
            .map_err(|e| BrokerError::Validation(e.to_string()))?;
        self.invoke_function("update-position-brackets", body)
            .await?;
        Ok(())
    }

    async fn close_position(
        &self,
        position_id: &str,
        competition_id: &str,
    ) -> Result<(), BrokerError> {
        let body = serde_json::json!({
            "position_id": position_id,
            "competition_id": competition_id,
        });
        self.invoke_function("close-position", body).await?;
        Ok(())
    }

    async fn place_order(&self, ticket: OrderTicket) -> Result<String, BrokerError> {
        let body = serde_json::to_value(&ticket)
            .map_err(|e| BrokerError::Validation(e.to_string()))?;
        let json = self.invoke_function("place-order", body).await?;

        // Older backend revisions return the id at the top level.
        let order_id = json
            .pointer("/data/order_id")
            .or_else(|| json.get("order_id"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("order-{}", Uuid::new_v4()));

        Ok(order_id)
    }

    async fn get_position(
        &self,
        position_id: &str,
        account_id: &str,
    ) -> Result<PositionSnapshot, BrokerError> {
        let rows = self
            .select(
                "positions",
                &[
                    ("id", format!("eq.{}", position_id)),
                    ("account_id", format!("eq.{}", account_id)),
                    ("select", POSITION_SELECT.to_string()),
                ],
            )
            .await?;

        let rows: Vec<PositionRow> = serde_json::from_value(rows)
            .map_err(|e| BrokerError::Remote(format!("positions: malformed row: {}", e)))?;

        rows.into_iter()
            .next()
            .map(|row| row.into_snapshot(account_id))
            .ok_or_else(|| BrokerError::NotFound(format!("position {} not found", position_id)))
    }

    async fn get_instrument(&self, symbol: &str) -> Result<Instrument, BrokerError> {
        let rows = self
            .select(
                "instruments",
                &[
                    ("symbol", format!("eq.{}", symbol)),
                    (
                        "select",
                        "id,symbol,leverage_default,contract_size".to_string(),
                    ),
                ],
            )
            .await?;

        let rows: Vec<Instrument> = serde_json::from_value(rows)
            .map_err(|e| BrokerError::Remote(format!("instruments: malformed row: {}", e)))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| BrokerError::NotFound(format!("instrument {} not found", symbol)))
    }

    async fn open_positions(&self, account_id: &str) -> Result<Vec<PositionSnapshot>, BrokerError> {
        let rows = self
            .select(
                "positions",
                &[
                    ("account_id", format!("eq.{}", account_id)),
                    ("status", "eq.open".to_string()),
                    ("select", POSITION_SELECT.to_string()),
                ],
            )
            .await?;

        let rows: Vec<PositionRow> = serde_json::from_value(rows)
            .map_err(|e| BrokerError::Remote(format!("positions: malformed row: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_snapshot(account_id))
            .collect())
    }

    async fn account_balance(&self, account_id: &str) -> Result<AccountBalance, BrokerError> {
        let rows = self
            .select(
                "accounts",
                &[
                    ("id", format!("eq.{}", account_id)),
                    ("select", "balance,equity".to_string()),
                ],
            )
            .await?;

        let rows: Vec<AccountBalance> = serde_json::from_value(rows)
            .map_err(|e| BrokerError::Remote(format!("accounts: malformed row: {}", e)))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| BrokerError::NotFound(format!("account {} not found", account_id)))
    }
}
