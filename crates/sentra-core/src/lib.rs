//! # Sentra Core
//!
//! The domain layer of the Sentra authentication service: entities,
//! tagged-union outcomes, credential validation rules, the ports that
//! infrastructure implements, and the account/auth services composed from
//! them. Everything infrastructure-specific lives behind the ports.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::DomainError;
