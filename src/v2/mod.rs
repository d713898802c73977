//! HAProxy PROXY Protocol version 2: binary header decoding and encoding.

mod builder;
mod decode;
mod error;
mod model;

pub use builder::ProxyHeaderBuilder;
pub use decode::{decode, decode_with_tlvs, FIXED_HEADER_LEN, SIGNATURE};
pub use error::DecodeError;
pub use model::{Command, Family, ProxyHeader, Tlv, Transport};
