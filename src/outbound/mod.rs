//! Outbound adapters implementing the domain ports.

pub mod diagnosis;
pub mod password;
pub mod persistence;
pub mod storage;
