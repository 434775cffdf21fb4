use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    pub backend: Option<BackendConfig>,
    pub session: Option<SessionConfig>,
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub settlement: SettlementConfig,
    #[serde(default)]
    pub flags: ConfigFlags,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BackendConfig {
    #[serde(alias = "baseUrl")]
    pub base_url: Option<String>,
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    #[serde(alias = "accountId")]
    pub account_id: Option<String>,
    #[serde(alias = "accountName")]
    pub account_name: Option<String>,
    pub currency: Option<String>,
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
    #[serde(alias = "competitionId")]
    pub competition_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerConfig {
    pub port: Option<u16>,
}

/// Tuning for the wait between closing and reopening during a reversal.
/// The close is confirmed by polling the read path; the fixed delay is only
/// the fallback when the poll budget runs out.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SettlementConfig {
    pub poll_interval_ms: u64,
    pub max_polls: u32,
    pub fallback_delay_ms: u64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        SettlementConfig {
            poll_interval_ms: 100,
            max_polls: 5,
            fallback_delay_ms: 500,
        }
    }
}

/// Declarative host-side UI flags. Each one toggles an affordance in the
/// front end; the adapter's obligation is to honor the subset it claims
/// (e.g. `supportModifyPosition` implies `modify_position` works).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFlags {
    #[serde(rename = "supportNativeReversePosition")]
    pub support_native_reverse_position: bool,
    #[serde(rename = "supportClosePosition")]
    pub support_close_position: bool,
    #[serde(rename = "supportPLUpdate")]
    pub support_pl_update: bool,
    #[serde(rename = "supportOrderBrackets")]
    pub support_order_brackets: bool,
    #[serde(rename = "supportMarketBrackets")]
    pub support_market_brackets: bool,
    #[serde(rename = "supportPositionBrackets")]
    pub support_position_brackets: bool,
    #[serde(rename = "supportModifyPosition")]
    pub support_modify_position: bool,
    #[serde(rename = "supportOrdersHistory")]
    pub support_orders_history: bool,
    #[serde(rename = "supportDOM")]
    pub support_dom: bool,
    #[serde(rename = "supportStopLimitOrders")]
    pub support_stop_limit_orders: bool,
    #[serde(rename = "supportMarketOrders")]
    pub support_market_orders: bool,
    #[serde(rename = "supportLimitOrders")]
    pub support_limit_orders: bool,
    #[serde(rename = "supportStopOrders")]
    pub support_stop_orders: bool,
    #[serde(rename = "supportMultiposition")]
    pub support_multiposition: bool,
    #[serde(rename = "showQuantityInsteadOfAmount")]
    pub show_quantity_instead_of_amount: bool,
    #[serde(rename = "supportEditAmount")]
    pub support_edit_amount: bool,
    #[serde(rename = "supportLevel2Data")]
    pub support_level2_data: bool,
}

impl Default for ConfigFlags {
    fn default() -> Self {
        ConfigFlags {
            support_native_reverse_position: true,
            support_close_position: true,
            support_pl_update: true,
            support_order_brackets: true,
            support_market_brackets: true,
            support_position_brackets: true,
            support_modify_position: true,
            support_orders_history: true,
            support_dom: true,
            support_stop_limit_orders: true,
            support_market_orders: true,
            support_limit_orders: true,
            support_stop_orders: true,
            support_multiposition: false,
            show_quantity_instead_of_amount: true,
            support_edit_amount: false,
            support_level2_data: false,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let home = env::var("HOME").unwrap_or_else(|_| ".".into());

        let s = Config::builder()
            // 1. Global config from ~/.arena/config.{json,toml}
            .add_source(File::with_name(&format!("{}/.arena/config", home)).required(false))
            // 2. Project config from config/config
            .add_source(File::with_name("config/config").required(false))
            // 3. Local overrides (not checked in)
            .add_source(File::with_name("config/local").required(false))
            // 4. Environment overrides, e.g. ARENA_BACKEND__BASE_URL
            .add_source(Environment::with_prefix("ARENA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
