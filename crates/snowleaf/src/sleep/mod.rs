mod interface;
mod interruptible;
mod thread_sleep;

pub use interface::*;
pub use interruptible::*;
pub use thread_sleep::*;
