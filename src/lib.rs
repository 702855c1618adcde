//! A persistent, memory-mapped on-disk hash table.
//!
//! A [`Table`] is a single file whose header, open-addressed slot array,
//! insertion-order store directory, and fixed-stride record arena are all
//! memory-mapped and manipulated in place: there is no write-ahead log, no
//! external cache, and no serialization step between a lookup and the bytes
//! it returns.
//!
//! ```no_run
//! use diskhash::{AccessMode, CreateMode, Options, Table};
//!
//! let opts = Options::new(32, 8);
//! let mut table = Table::open("example.dht", opts, AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
//! table.insert(b"alpha", &1u64.to_le_bytes()).unwrap();
//! assert_eq!(table.lookup(b"alpha"), Some(&1u64.to_le_bytes()[..]));
//! table.free().unwrap();
//! ```

pub mod error;
pub mod hash;
pub mod layout;
mod os;
pub mod options;
pub mod slots;
pub mod store;
pub mod table;

pub use error::{Kind, Result, TableError};
pub use hash::{KeyHasher, SeaKeyHasher};
pub use options::{AccessMode, CreateMode, Options};
pub use table::{Iter, Table};