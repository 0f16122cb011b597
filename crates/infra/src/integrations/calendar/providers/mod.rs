//! Calendar provider implementations

pub mod google;
pub mod memory;
