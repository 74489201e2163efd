#![cfg(test)]

pub mod common;
pub mod binding_tests;
pub mod concurrency_tests;
