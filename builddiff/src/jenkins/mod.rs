mod client;
mod matching;
mod provider;
mod types;

pub use client::*;
pub use matching::*;
pub use provider::*;
pub use types::*;
