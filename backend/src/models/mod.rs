pub mod catalogue;
pub mod time;

pub use catalogue::*;
pub use time::*;
