//! # Repository Module
//!
//! Database repository implementations for the basket store.
//!
//! ```text
//!  Route handler
//!       │  db.baskets().load("shoppingBasket")
//!       ▼
//!  BasketRepository
//!  ├── load(&self, key)          corrupt or missing → empty basket
//!  ├── load_checked(&self, key)  corrupt → StoreError::StorageCorrupt
//!  ├── save(&self, key, basket)  atomic upsert
//!  └── delete(&self, key)
//!       │
//!       ▼
//!  SQLite (basket_storage)
//! ```
//!
//! ## Available Repositories
//!
//! - [`BasketRepository`](basket::BasketRepository) - Named basket records

pub mod basket;
