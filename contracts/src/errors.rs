//! Contract error types for the Activity Betting Market.

use soroban_sdk::contracterror;

/// Contract error types
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    /// Contract has already been initialized
    AlreadyInitialized = 1,
    /// Token and stake amount not set - call initialize first
    NotInitialized = 2,
    /// Malformed title, choices, duration, price, or choice index
    InvalidInput = 3,
    /// Unknown activity or ticket id
    NotFound = 4,
    /// Caller is not the activity creator or ticket owner
    Unauthorized = 5,
    /// Operation attempted outside its required lifecycle phase
    InvalidState = 6,
    /// Caller's token balance is below the required amount
    InsufficientFunds = 7,
    /// Caller's token allowance for the contract is below the required amount
    InsufficientAllowance = 8,
    /// No stake backs the declared winning choice
    NoWinningStake = 9,
    /// Arithmetic overflow occurred
    Overflow = 10,
}
