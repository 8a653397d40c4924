//! Client-side state containers: the live cart and wishlist, durable across
//! restarts via a local JSON file per namespace, plus the debounced
//! abandoned-cart sync service.

pub mod cart;
pub mod sync;
pub mod wishlist;

pub use cart::CartStore;
pub use sync::{CartSync, HttpSyncSink, SyncSink};
pub use wishlist::WishlistStore;
