//! # Repository Module
//!
//! Database repositories for Shopfront.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │  db.products().get(id)                                         │
//! │       ▼                                                                 │
//! │  ProductRepository                    OrderRepository                  │
//! │  ├── list / get                       ├── list / get                   │
//! │  ├── create / update / delete         ├── create_record / add_line     │
//! │  └── decrement stock                  ├── update_record / update_status│
//! │       │                               └── delete / list_lines          │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository also exposes crate-private functions taking a
//! `&mut SqliteConnection`, used by [`crate::placement`] inside its
//! transaction.

pub mod order;
pub mod product;
