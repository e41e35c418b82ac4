//! API response types

pub mod response;
