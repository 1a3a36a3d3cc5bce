//! ConnectionRegistry の実装
//!
//! - `inmemory`: HashMap を単一の Mutex で守るインメモリ実装

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
