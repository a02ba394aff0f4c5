use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

#[derive(Debug, Default, PartialEq)]
pub struct Totals {
    pub items: u32,
    pub price: f64,
}

/// At most one entry per product id; every mutation rewrites the whole
/// slot file, last writer wins.
#[derive(Debug)]
pub struct Cart {
    entries: Vec<CartEntry>,
    slot: PathBuf,
}

impl Cart {
    /// An absent, unreadable or malformed slot yields an empty cart.
    pub fn load(slot: impl AsRef<Path>) -> Self {
        let slot = slot.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&slot) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("discarding malformed cart at {}: {e}", slot.display());
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Self { entries, slot }
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<()> {
        if quantity == 0 {
            bail!("Quantity must be a positive integer");
        }

        if let Some(entry) = self.entries.iter_mut().find(|x| x.product.id == product.id) {
            entry.quantity += quantity;
        } else {
            self.entries.push(CartEntry {
                product: product.clone(),
                quantity,
            });
        }

        self.persist()?;
        log::info!("{} added to cart", product.name);
        Ok(())
    }

    /// Removing an id that is not in the cart is a no-op.
    pub fn remove(&mut self, id: u32) -> Result<()> {
        self.entries.retain(|x| x.product.id != id);
        self.persist()
    }

    pub fn totals(&self) -> Totals {
        Totals {
            items: self.entries.iter().map(|x| x.quantity).sum(),
            price: self
                .entries
                .iter()
                .map(|x| x.product.price.get() * x.quantity as f64)
                .sum(),
        }
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.slot.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.slot, serde_json::to_string(&self.entries)?)
            .with_context(|| format!("Failed to persist cart to {}", self.slot.display()))
    }
}

#[cfg(test)]
mod tests {
    use typed_floats::tf64::NonNaN;

    use super::*;

    fn product(id: u32, name: &str, price: f64) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: String::new(),
            filename: format!("{id}.jpg"),
            color: None,
            price: NonNaN::new(price).unwrap(),
            full_category: "Footwear".to_string(),
            main_category: "Footwear".to_string(),
            sub_category: None,
        }
    }

    #[test]
    fn add_merges_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut cart = Cart::load(dir.path().join("cart.json"));

        let shoe = product(1, "Trail Runner", 50.0);
        cart.add(&shoe, 2).unwrap();
        cart.add(&shoe, 3).unwrap();

        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.entries()[0].quantity, 5);
        assert_eq!(cart.totals(), Totals { items: 5, price: 250.0 });
    }

    #[test]
    fn zero_quantity_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut cart = Cart::load(dir.path().join("cart.json"));
        assert!(cart.add(&product(1, "Trail Runner", 50.0), 0).is_err());
        assert!(cart.entries().is_empty());
    }

    #[test]
    fn remove_empties_cart_and_slot() {
        let dir = tempfile::tempdir().unwrap();
        let slot = dir.path().join("cart.json");
        let mut cart = Cart::load(&slot);

        cart.add(&product(1, "Trail Runner", 50.0), 3).unwrap();
        cart.remove(1).unwrap();

        assert!(cart.entries().is_empty());
        assert_eq!(cart.totals(), Totals { items: 0, price: 0.0 });

        let persisted: Vec<CartEntry> =
            serde_json::from_str(&fs::read_to_string(&slot).unwrap()).unwrap();
        assert!(persisted.is_empty());
    }

    #[test]
    fn remove_absent_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut cart = Cart::load(dir.path().join("cart.json"));

        cart.add(&product(1, "Trail Runner", 50.0), 1).unwrap();
        cart.remove(42).unwrap();
        assert_eq!(cart.entries().len(), 1);
    }

    #[test]
    fn totals_mix_prices() {
        let dir = tempfile::tempdir().unwrap();
        let mut cart = Cart::load(dir.path().join("cart.json"));

        cart.add(&product(1, "Trail Runner", 50.0), 2).unwrap();
        cart.add(&product(2, "Summer Dress", 80.0), 1).unwrap();

        assert_eq!(cart.totals(), Totals { items: 3, price: 180.0 });
    }

    #[test]
    fn slot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let slot = dir.path().join("cart.json");

        let mut cart = Cart::load(&slot);
        cart.add(&product(1, "Trail Runner", 50.0), 2).unwrap();
        cart.add(&product(2, "Summer Dress", 80.0), 1).unwrap();
        let entries = cart.entries().to_vec();
        drop(cart);

        let restored = Cart::load(&slot);
        assert_eq!(restored.entries(), entries);
    }

    #[test]
    fn malformed_slot_recovers_empty() {
        let dir = tempfile::tempdir().unwrap();
        let slot = dir.path().join("cart.json");
        fs::write(&slot, "definitely not a cart").unwrap();

        let cart = Cart::load(&slot);
        assert!(cart.entries().is_empty());
        assert_eq!(cart.totals(), Totals { items: 0, price: 0.0 });
    }

    #[test]
    fn missing_slot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cart = Cart::load(dir.path().join("nope").join("cart.json"));
        assert!(cart.entries().is_empty());
    }
}
