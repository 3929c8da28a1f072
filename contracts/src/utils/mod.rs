//! Common Smart Contracts utilities.
pub mod cryptography;
pub mod math;
pub mod nonces;
