//! Integration tests for gradetree

mod cli_contracts;
mod grading_scenarios;
mod store_integration;
mod tree_properties;
