//! Board features.
//!
//! Each module adds the operations of one functional block to [`Board`](crate::Board).

pub mod encoder;
pub mod od;
pub mod opto;
pub mod relay;
