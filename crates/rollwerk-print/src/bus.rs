// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Notification bus: fire-and-forget event emission to the host app.
//
// Events are posted once, with no acknowledgment, retry, or backpressure.
// Same-name events from one session preserve emission order; nothing is
// guaranteed across names.

use tokio::sync::broadcast;
use tracing::debug;

use rollwerk_core::types::PluginEvent;

/// One-directional event channel from the engine to its subscribers.
///
/// Cheaply cloneable; all clones share the same channel.
#[derive(Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<PluginEvent>,
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Attach a listener.  Only events emitted after this call are seen.
    pub fn subscribe(&self) -> broadcast::Receiver<PluginEvent> {
        self.sender.subscribe()
    }

    /// Post an event.  An absent listener is not an error — the event is
    /// simply dropped, matching the plugin notification contract.
    pub fn emit(&self, event: PluginEvent) {
        match self.sender.send(event) {
            Ok(receivers) => debug!(receivers, "event emitted"),
            Err(_) => debug!("event emitted with no listeners"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_listeners_is_not_an_error() {
        let bus = NotificationBus::new(8);
        bus.emit(PluginEvent::PrintFailedCommunication { value: true });
    }

    #[tokio::test]
    async fn same_name_events_preserve_order() {
        let bus = NotificationBus::new(8);
        let mut rx = bus.subscribe();
        for name in ["A", "B", "C"] {
            bus.emit(PluginEvent::BleAvailable {
                local_name_list: vec![name.into()],
            });
        }
        for name in ["A", "B", "C"] {
            assert_eq!(
                rx.recv().await.unwrap(),
                PluginEvent::BleAvailable {
                    local_name_list: vec![name.into()],
                }
            );
        }
    }

    #[tokio::test]
    async fn late_subscribers_miss_earlier_events() {
        let bus = NotificationBus::new(8);
        bus.emit(PluginEvent::PrintFailedCommunication { value: true });
        let mut rx = bus.subscribe();
        bus.emit(PluginEvent::IpAddressAvailable {
            ip_address_list: vec![],
        });
        assert_eq!(
            rx.recv().await.unwrap(),
            PluginEvent::IpAddressAvailable {
                ip_address_list: vec![],
            }
        );
    }
}
