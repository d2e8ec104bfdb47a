pub mod decode;

pub use decode::DecodeEngine;
