pub mod magic;
pub mod test_helpers;
