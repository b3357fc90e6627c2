//! Type definitions for watchfinder

mod availability;
mod error;
mod offer;
mod title;

pub use availability::*;
pub use error::*;
pub use offer::*;
pub use title::*;
