mod fixed;
mod interface;
mod memory;

pub use fixed::*;
pub use interface::*;
pub use memory::*;
