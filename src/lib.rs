pub mod digest;
pub mod error;
pub mod folder;
pub mod index;
pub mod record;
pub mod store;

pub use error::{Error, Result};
