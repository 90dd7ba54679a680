//! Property-based tests over the operation apply rules

pub mod operation_proptest;
