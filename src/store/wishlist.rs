use std::fs;
use std::path::{Path, PathBuf};

pub const WISHLIST_NAMESPACE: &str = "trl-wishlist";

/// A persisted set of product ids. No quantity or size dimension.
pub struct WishlistStore {
    items: Vec<String>,
    path: Option<PathBuf>,
}

impl WishlistStore {
    pub fn open_at(dir: &Path) -> Self {
        let path = dir.join(format!("{WISHLIST_NAMESPACE}.json"));
        let items = fs::read(&path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default();
        Self {
            items,
            path: Some(path),
        }
    }

    pub fn ephemeral() -> Self {
        Self {
            items: Vec::new(),
            path: None,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn add(&mut self, product_id: &str) {
        if !self.contains(product_id) {
            self.items.push(product_id.to_string());
            self.save();
        }
    }

    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|id| id != product_id);
        self.save();
    }

    pub fn toggle(&mut self, product_id: &str) {
        if self.contains(product_id) {
            self.remove(product_id);
        } else {
            self.add(product_id);
        }
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|id| id == product_id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.save();
    }

    fn save(&self) {
        let Some(path) = &self.path else { return };
        match serde_json::to_vec(&self.items) {
            Ok(bytes) => {
                if let Err(err) = fs::write(path, bytes) {
                    tracing::warn!(error = %err, "failed to persist wishlist");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize wishlist"),
        }
    }
}
