//! 具体渠道实现

pub mod kore;

pub use kore::{KoreChannel, KoreConfig};
