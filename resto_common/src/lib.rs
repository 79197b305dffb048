mod helpers;
mod rupiah;
mod secret;

pub mod op;

pub use helpers::{parse_boolean_flag, parse_env_value};
pub use rupiah::{Rupiah, RupiahConversionError};
pub use secret::Secret;
