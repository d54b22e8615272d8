pub mod promotion;
#[cfg(test)]
pub mod test_utils;

pub use promotion::{Policy, Promotion};
