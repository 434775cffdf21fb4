mod brackets;
mod capabilities;
mod context_menu;
mod orders;
mod positions;

pub use capabilities::{AccountManagerInfo, AccountPage, POSITION_ACTIONS};
pub use context_menu::{MenuCommand, MenuEntry, UiEvent, UiNode};

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::{ConfigFlags, SettlementConfig};
use crate::context::SessionContext;
use crate::host::HostHandle;
use crate::model::Instrument;
use crate::remote::RemoteTradingService;

/// The broker adapter: implements the host trading contract and bridges it
/// to the remote backend that owns accounts, positions and orders.
///
/// Methods are asynchronous tasks driven by the host's event loop; the only
/// suspension points are remote calls and the reversal settlement wait, and
/// no operation is cancellable once started.
pub struct Broker {
    remote: Arc<dyn RemoteTradingService>,
    host: Arc<dyn HostHandle>,
    ctx: SessionContext,
    flags: ConfigFlags,
    settlement: SettlementConfig,
    /// Per-position operation lease: a bracket edit racing a close on the
    /// same position serializes here instead of interleaving at the backend.
    leases: DashMap<String, Arc<Mutex<()>>>,
    /// Instruments are immutable reference data, cached per symbol.
    instruments: DashMap<String, Instrument>,
}

impl Broker {
    pub fn new(
        remote: Arc<dyn RemoteTradingService>,
        host: Arc<dyn HostHandle>,
        ctx: SessionContext,
        flags: ConfigFlags,
        settlement: SettlementConfig,
    ) -> Self {
        Broker {
            remote,
            host,
            ctx,
            flags,
            settlement,
            leases: DashMap::new(),
            instruments: DashMap::new(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.ctx
    }

    /// Acquire the mutation lease for one position. Held across the whole
    /// operation; reversal holds it over its entire close/reopen sequence.
    pub(crate) async fn lease(&self, position_id: &str) -> OwnedMutexGuard<()> {
        let cell = Arc::clone(
            &*self
                .leases
                .entry(position_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        );
        cell.lock_owned().await
    }
}
