pub mod error;

pub use error::{DowserError, Result};
