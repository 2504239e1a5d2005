//! Domain types shared by every service

pub mod catalog;
pub mod family;
pub mod registration;

pub use catalog::*;
pub use family::*;
pub use registration::*;
