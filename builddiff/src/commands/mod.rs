pub mod auth;

mod builds;
mod command;
mod diff;
mod list;

pub use builds::*;
pub use command::*;
pub use diff::*;
pub use list::*;
