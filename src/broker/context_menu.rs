use std::collections::HashMap;
use tracing::{debug, error};

use crate::host::BrokerEvent;

use super::Broker;

/// A node in the host's rendered account-manager DOM, reduced to what the
/// adapter inspects: tag, attributes, parent chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub parent: Option<Box<UiNode>>,
}

impl UiNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Nearest ancestor (or self) carrying a position identifier, checking
    /// `data-position-id` first and `data-id` second on each node.
    fn closest_position_id(&self) -> Option<String> {
        let mut node = Some(self);
        while let Some(n) = node {
            if let Some(id) = n.attr("data-position-id").or_else(|| n.attr("data-id")) {
                return Some(id.to_string());
            }
            node = n.parent.as_deref();
        }
        None
    }
}

/// A context-menu interaction as delivered by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiEvent {
    pub target: Option<UiNode>,
}

impl UiEvent {
    pub fn position_id(&self) -> Option<String> {
        self.target.as_ref().and_then(UiNode::closest_position_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    ProtectPosition { position_id: String },
    ClosePosition { position_id: String },
    ReversePosition { position_id: String },
    /// An entry supplied by the host; passed through untouched.
    Host { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Separator,
    Action {
        text: String,
        tooltip: Option<String>,
        command: MenuCommand,
    },
}

impl MenuEntry {
    fn action(text: &str, tooltip: &str, command: MenuCommand) -> Self {
        MenuEntry::Action {
            text: text.to_string(),
            tooltip: Some(tooltip.to_string()),
            command,
        }
    }
}

impl Broker {
    /// Build the context menu for a UI target. When the target sits inside a
    /// row carrying a position id, a fixed, ordered set of entries is
    /// prepended ahead of whatever the host supplies; otherwise the host
    /// entries pass through unchanged.
    pub fn context_menu_actions(
        &self,
        event: &UiEvent,
        host_actions: Vec<MenuEntry>,
    ) -> Vec<MenuEntry> {
        let Some(position_id) = event.position_id() else {
            debug!("context_menu_actions: no position target");
            return host_actions;
        };
        debug!(position_id = %position_id, "context_menu_actions");

        let mut entries = vec![
            MenuEntry::action(
                "Protect Position",
                "Edit Stop Loss and Take Profit",
                MenuCommand::ProtectPosition {
                    position_id: position_id.clone(),
                },
            ),
            MenuEntry::Separator,
            MenuEntry::action(
                "Close Position",
                "Close this position at market price",
                MenuCommand::ClosePosition {
                    position_id: position_id.clone(),
                },
            ),
            MenuEntry::action(
                "Reverse Position",
                "Close current and open opposite position",
                MenuCommand::ReversePosition { position_id },
            ),
        ];
        entries.extend(host_actions);
        entries
    }

    /// Execute a menu entry. Runs inside a host-owned UI callback, so
    /// failures are logged and reported but never rethrown: one failing
    /// action must not break the menu's render cycle.
    pub async fn invoke_menu_command(&self, command: MenuCommand) {
        match command {
            MenuCommand::ProtectPosition { position_id } => {
                if !self.host.open_modify_dialog(&position_id) {
                    self.host.dispatch_ui_event("arena-edit-position", &position_id);
                    self.host.emit(BrokerEvent::Info {
                        message: "Drag SL/TP lines on chart to modify brackets".to_string(),
                    });
                }
            }
            MenuCommand::ClosePosition { position_id } => {
                if let Err(e) = self.close_position(&position_id).await {
                    error!(position_id = %position_id, error = %e, "close from context menu failed");
                }
            }
            MenuCommand::ReversePosition { position_id } => {
                if let Err(e) = self.reverse_position(&position_id).await {
                    error!(position_id = %position_id, error = %e, "reverse from context menu failed");
                }
            }
            MenuCommand::Host { id } => {
                debug!(id = %id, "host-supplied action, nothing to dispatch");
            }
        }
    }
}
