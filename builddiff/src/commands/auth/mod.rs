mod login;
mod logout;

pub use login::*;
pub use logout::*;
