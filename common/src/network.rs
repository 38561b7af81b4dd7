//! Address handling: range expressions, target lists and prefixed addresses.

pub mod cidr;
pub mod range;
pub mod target;
