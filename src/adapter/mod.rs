//! Adapters: the command line on the driving side, SQLite on the driven side.

pub mod inbound;
pub mod outbound;
