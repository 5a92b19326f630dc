//! Domain module for the access guard

pub mod operator;

pub use operator::{OperatorContext, OperatorRole};
