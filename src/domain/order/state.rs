//! Order state containers: app-owned, SDK-provided update logic.

use super::OrderEvent;
use crate::shared::OrderId;
use crate::ws::DomainEvent;

/// Open orders keyed by id, most recently updated first.
///
/// The app owns instances of this type and feeds it events from the bus.
/// An update for a known id replaces the entry wholesale and moves it to the
/// front; a terminal status removes it. Past `cap`, the least recently
/// updated order is dropped.
#[derive(Debug, Clone)]
pub struct OpenOrders {
    orders: Vec<OrderEvent>,
    cap: usize,
}

impl OpenOrders {
    pub const DEFAULT_CAP: usize = 100;

    pub fn new(cap: usize) -> Self {
        Self {
            orders: Vec::new(),
            cap: cap.max(1),
        }
    }

    /// Apply a stream event; non-order events are ignored.
    pub fn apply(&mut self, event: &DomainEvent) {
        if let DomainEvent::OrderEvent(order) = event {
            self.upsert(order.clone());
        }
    }

    /// Insert or update an order. Last write wins per id.
    pub fn upsert(&mut self, order: OrderEvent) {
        if order.id.is_empty() {
            tracing::debug!("Ignoring order event without id ({})", order.status);
            return;
        }

        self.orders.retain(|o| o.id != order.id);
        if order.status.is_terminal() {
            return;
        }

        self.orders.insert(0, order);
        self.orders.truncate(self.cap);
    }

    /// Replace all orders (e.g. from a REST fetch). Terminal and duplicate
    /// entries are dropped; the first occurrence of an id wins.
    pub fn replace(&mut self, orders: impl IntoIterator<Item = OrderEvent>) {
        self.orders.clear();
        for order in orders {
            if self.orders.len() >= self.cap {
                break;
            }
            if order.id.is_empty()
                || order.status.is_terminal()
                || self.orders.iter().any(|o| o.id == order.id)
            {
                continue;
            }
            self.orders.push(order);
        }
    }

    pub fn remove(&mut self, id: &OrderId) -> Option<OrderEvent> {
        let idx = self.orders.iter().position(|o| &o.id == id)?;
        Some(self.orders.remove(idx))
    }

    pub fn get(&self, id: &OrderId) -> Option<&OrderEvent> {
        self.orders.iter().find(|o| &o.id == id)
    }

    pub fn orders(&self) -> &[OrderEvent] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }
}

impl Default for OpenOrders {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAP)
    }
}
