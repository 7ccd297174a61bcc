mod key;
mod values;
mod error;

pub use key::Key;
pub use values::VectorValues;
pub use error::{LsqpError, Result};
