//! Test modules for the Activity Betting Market contract.

mod common;
