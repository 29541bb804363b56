//! Integration tests

mod config_test;
mod parlay_test;
mod pricing_test;
