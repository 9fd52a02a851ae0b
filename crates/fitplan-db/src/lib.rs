//! Persistence for fitplan: configuration, connection pooling, migrations,
//! and query functions for stored chat exchanges.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
