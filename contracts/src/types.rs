//! Type definitions for the Activity Betting Market.

use soroban_sdk::{contracttype, Address, String, Vec};

/// Sentinel written to `winning_choice` when an activity is cancelled.
/// Valid choice indices are bounded far below this (choice strings are
/// length-capped), so it can never collide with a real winner.
pub const NO_WINNING_CHOICE: u32 = u32::MAX;

/// Maximum byte length of a single choice string.
pub const MAX_CHOICE_LEN: u32 = 64;

/// Storage keys for contract data
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Address of the external token contract used for stakes and payouts
    Token,
    /// Fixed stake amount pulled per bet, in token units
    StakeAmount,
    /// Number of activities ever created; next activity id
    ActivityCount,
    /// One activity record, keyed by its sequential id
    Activity(u32),
    /// Number of tickets ever minted; next ticket id
    TicketCount,
    /// One ticket record, keyed by its sequential id
    Ticket(u32),
}

/// A time-boxed prediction market with named choices and a pooled stake
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Activity {
    /// Creator address; sole authority for early close, settle, cancel
    pub creator: Address,
    pub title: String,
    /// Ordered choice labels, fixed after creation
    pub choices: Vec<String>,
    /// Betting deadline as a ledger timestamp; moved to "now" exactly
    /// once by an early close
    pub end_time: u64,
    /// Sum of purchase prices of all unsettled tickets; zeroed at
    /// settlement or cancellation
    pub total_pool: i128,
    /// One-way false -> true; the sole authority on whether
    /// `winning_choice` holds a meaningful value
    pub is_settled: bool,
    /// Winning choice index after settlement, NO_WINNING_CHOICE after
    /// cancellation; stays 0 (meaningless) while unsettled
    pub winning_choice: u32,
    /// Ids of tickets minted against this activity, in mint order
    pub ticket_ids: Vec<u32>,
}

/// A transferable record of one stake on one choice of one activity.
/// Never destroyed; only `owner`, `is_listed` and `list_price` change
/// after mint.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Ticket {
    pub activity_id: u32,
    /// Index into the activity's `choices`
    pub choice: u32,
    /// Stake originally escrowed to mint this ticket
    pub purchase_price: i128,
    /// Current holder; payouts and refunds go here
    pub owner: Address,
    pub is_listed: bool,
    /// Resale price; meaningful only while `is_listed`
    pub list_price: i128,
}
