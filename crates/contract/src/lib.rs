//! `routegate-contract` — client contract generation and consumption.
//!
//! The generator walks the frozen registry and emits a deterministic type
//! map for clients; the client consumes the same envelope discipline at
//! runtime, narrowing responses by status-code family.

pub mod client;
pub mod generator;

pub use client::{ApiResponse, Client, ClientError};
pub use generator::{
    Contract, ContractAuth, ContractMethod, ContractResponse, ContractRoute, RequestField,
    generate,
};
