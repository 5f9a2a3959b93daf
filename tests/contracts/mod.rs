//! CLI parse and output contracts

mod output_contracts;
mod parse_contracts;
