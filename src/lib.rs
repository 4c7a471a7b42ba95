pub mod config;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod logging;
pub mod reader;
pub mod resolver;
pub mod transport;
pub mod types;

pub use config::Config;
pub use decoder::{decode, decode_message};
pub use encoder::{encode, encode_a};
pub use errors::{LookupError, Result};
pub use resolver::Resolver;
pub use types::*;
