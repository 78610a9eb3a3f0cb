#![no_std]
//! # Activity Betting Market
//!
//! Pari-mutuel Soroban prediction market. Users stake a fixed amount of an
//! external token on one choice of a time-boxed activity; winning tickets
//! split the pool proportionally at settlement, and tickets can be resold
//! peer-to-peer before then.
//!
//! ## Key Features
//! - Activity lifecycle: open, early close, settle or cancel (creator only)
//! - Token escrow through the standard token interface
//! - Proportional payouts that conserve the pool exactly
//! - Transferable tickets with an owner-listed secondary market

mod contract;
mod errors;
mod types;

#[cfg(test)]
mod tests;

pub use contract::ActivityMarketContract;
pub use errors::ContractError;
pub use types::{Activity, DataKey, Ticket, MAX_CHOICE_LEN, NO_WINNING_CHOICE};
