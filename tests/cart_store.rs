use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_decimal::Decimal;
use uuid::Uuid;

use racket_lab_api::models::CartItem;
use racket_lab_api::store::{CartStore, CartSync, SyncSink, WishlistStore};

fn item(name: &str, size: &str, price: &str, quantity: i32) -> CartItem {
    let product_id = Uuid::new_v4();
    CartItem {
        variant_id: CartItem::variant_id_for(product_id, size),
        product_id,
        name: name.into(),
        size: size.into(),
        price: Decimal::from_str_exact(price).unwrap(),
        quantity,
        image: String::new(),
    }
}

fn temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("racket-lab-test-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn adding_same_variant_merges_quantities() {
    let mut cart = CartStore::ephemeral();
    let first = item("Camiseta Pro", "M", "29.99", 1);
    let mut second = first.clone();
    second.quantity = 2;

    cart.add_item(first);
    cart.add_item(second);

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 3);
    assert_eq!(cart.total_items(), 3);
    assert!(cart.is_open(), "adding should open the cart panel");
}

#[test]
fn distinct_sizes_are_distinct_lines() {
    let mut cart = CartStore::ephemeral();
    cart.add_item(item("Camiseta Pro", "M", "29.99", 1));
    cart.add_item(item("Camiseta Pro", "L", "29.99", 1));
    assert_eq!(cart.items().len(), 2);
}

#[test]
fn zero_or_negative_quantity_removes_the_line() {
    let mut cart = CartStore::ephemeral();
    let line = item("Camiseta Pro", "M", "29.99", 2);
    let variant_id = line.variant_id.clone();
    cart.add_item(line);

    cart.update_quantity(&variant_id, 0);
    assert!(cart.items().is_empty());

    let line = item("Sudadera Club", "L", "44.90", 1);
    let variant_id = line.variant_id.clone();
    cart.add_item(line);
    cart.update_quantity(&variant_id, -3);
    assert!(cart.items().is_empty());
}

#[test]
fn totals_reflect_price_times_quantity() {
    let mut cart = CartStore::ephemeral();
    assert_eq!(cart.total_price(), Decimal::ZERO);
    assert_eq!(cart.total_items(), 0);

    cart.add_item(item("Camiseta Pro", "M", "29.99", 2));
    cart.add_item(item("Falda Open", "S", "27.50", 1));

    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.total_price(), Decimal::from_str_exact("87.48").unwrap());
}

#[test]
fn cart_survives_a_reload() {
    let dir = temp_dir();

    let mut cart = CartStore::open_at(&dir);
    cart.add_item(item("Camiseta Pro", "M", "29.99", 2));
    let variant_id = cart.items()[0].variant_id.clone();
    drop(cart);

    let reloaded = CartStore::open_at(&dir);
    assert_eq!(reloaded.items().len(), 1);
    assert_eq!(reloaded.items()[0].variant_id, variant_id);
    assert_eq!(reloaded.items()[0].quantity, 2);
    assert!(!reloaded.is_open(), "panel state is not persisted");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn wishlist_toggle_round_trips() {
    let mut wishlist = WishlistStore::ephemeral();
    wishlist.toggle("producto-1");
    assert!(wishlist.contains("producto-1"));

    // Re-adding is a no-op, not a duplicate.
    wishlist.add("producto-1");
    assert_eq!(wishlist.items().len(), 1);

    wishlist.toggle("producto-1");
    assert!(!wishlist.contains("producto-1"));
}

#[test]
fn wishlist_survives_a_reload() {
    let dir = temp_dir();

    let mut wishlist = WishlistStore::open_at(&dir);
    wishlist.add("producto-1");
    wishlist.add("producto-2");
    drop(wishlist);

    let reloaded = WishlistStore::open_at(&dir);
    assert_eq!(reloaded.items(), ["producto-1", "producto-2"]);

    std::fs::remove_dir_all(&dir).ok();
}

#[derive(Clone)]
struct MemorySink {
    deliveries: Arc<Mutex<Vec<Vec<CartItem>>>>,
}

impl SyncSink for MemorySink {
    async fn deliver(&self, items: Vec<CartItem>) -> anyhow::Result<()> {
        self.deliveries.lock().unwrap().push(items);
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn rapid_changes_collapse_into_one_flush() {
    let deliveries = Arc::new(Mutex::new(Vec::new()));
    let sync = CartSync::with_delay(
        MemorySink {
            deliveries: Arc::clone(&deliveries),
        },
        Duration::from_secs(5),
    );

    let line = item("Camiseta Pro", "M", "29.99", 1);
    sync.on_change(vec![line.clone()]);
    let mut two = line.clone();
    two.quantity = 2;
    sync.on_change(vec![two.clone()]);
    let mut three = line.clone();
    three.quantity = 3;
    sync.on_change(vec![three.clone()]);

    tokio::time::sleep(Duration::from_secs(6)).await;
    // Let the flushed task run to completion.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    let deliveries = deliveries.lock().unwrap();
    assert_eq!(deliveries.len(), 1, "edits within the window collapse");
    assert_eq!(deliveries[0][0].quantity, 3, "latest snapshot wins");
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_the_pending_flush() {
    let deliveries = Arc::new(Mutex::new(Vec::new()));
    let sync = CartSync::with_delay(
        MemorySink {
            deliveries: Arc::clone(&deliveries),
        },
        Duration::from_secs(5),
    );

    sync.on_change(vec![item("Camiseta Pro", "M", "29.99", 1)]);
    sync.cancel();

    tokio::time::sleep(Duration::from_secs(6)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert!(deliveries.lock().unwrap().is_empty());
}
