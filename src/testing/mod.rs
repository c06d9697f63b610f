//! Testing utilities and mock implementations
//!
//! This module provides mock implementations of the client capability and
//! the parameter host so the producer can be exercised without a broker or
//! a real host application.

pub mod mocks;

pub use mocks::*;
