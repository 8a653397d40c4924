use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;

use crate::models::CartItem;

/// Local persistence namespace, kept stable so carts survive restarts.
pub const CART_NAMESPACE: &str = "padel-wear-cart";

/// The shopper's in-progress selection. Single writer per client session; no
/// network calls originate here. Every mutation is mirrored to the backing
/// file so the cart survives reloads.
pub struct CartStore {
    items: Vec<CartItem>,
    is_open: bool,
    path: Option<PathBuf>,
}

impl CartStore {
    /// Load the persisted cart from `dir`, starting empty when the namespace
    /// file is absent or unreadable.
    pub fn open_at(dir: &Path) -> Self {
        let path = dir.join(format!("{CART_NAMESPACE}.json"));
        let items = fs::read(&path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default();
        Self {
            items,
            is_open: false,
            path: Some(path),
        }
    }

    /// A store without local durability, for short-lived sessions.
    pub fn ephemeral() -> Self {
        Self {
            items: Vec::new(),
            is_open: false,
            path: None,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Add a line; re-adding the same variant increments its quantity instead
    /// of duplicating the entry. Opens the cart panel as a side effect.
    pub fn add_item(&mut self, new_item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|i| i.variant_id == new_item.variant_id)
        {
            Some(existing) => existing.quantity += new_item.quantity,
            None => self.items.push(new_item),
        }
        self.is_open = true;
        self.save();
    }

    pub fn remove_item(&mut self, variant_id: &str) {
        self.items.retain(|i| i.variant_id != variant_id);
        self.save();
    }

    /// Set a line's quantity directly; zero or negative removes the line.
    /// Stock is only checked at add-time by the caller, not here.
    pub fn update_quantity(&mut self, variant_id: &str, quantity: i32) {
        if quantity <= 0 {
            self.remove_item(variant_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.variant_id == variant_id) {
            item.quantity = quantity;
        }
        self.save();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.save();
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum()
    }

    fn save(&self) {
        let Some(path) = &self.path else { return };
        match serde_json::to_vec(&self.items) {
            Ok(bytes) => {
                if let Err(err) = fs::write(path, bytes) {
                    tracing::warn!(error = %err, "failed to persist cart");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize cart"),
        }
    }
}
