// src/backend/adapter/mod.rs
// Outbound calls to the external patient-records and access-control services

pub mod connection;
pub mod record_gateway;
#[cfg(test)]
pub mod testing;

pub use connection::{Connection, InterCanisterConnection};
pub use record_gateway::{RecordGateway, SharingStatus};
