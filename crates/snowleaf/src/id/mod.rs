mod snowflake;

pub use snowflake::*;
