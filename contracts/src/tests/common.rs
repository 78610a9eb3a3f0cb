//! Shared fixtures for contract tests.

use crate::contract::{ActivityMarketContract, ActivityMarketContractClient};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{token, vec, Address, Env, String, Vec};

/// The fixed stake configured in tests: one token at 7 decimals
pub const STAKE: i128 = 1_0000000;

/// Registers the market against a fresh Stellar Asset Contract token and
/// initializes it with the fixed stake. Returns (env, market, token).
pub fn setup() -> (Env, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let token_admin = Address::generate(&env);
    let token = env.register_stellar_asset_contract_v2(token_admin).address();

    let market = env.register(ActivityMarketContract, ());
    let client = ActivityMarketContractClient::new(&env, &market);
    client.initialize(&token, &STAKE);

    (env, market, token)
}

/// Mints tokens to a user; plays the faucet's role in these tests
pub fn fund(env: &Env, token: &Address, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, token).mint(to, &amount);
}

/// Approves `spender` (the market) to pull `amount` from `from`
pub fn approve(env: &Env, token: &Address, from: &Address, spender: &Address, amount: i128) {
    token::Client::new(env, token).approve(from, spender, &amount, &1000);
}

pub fn balance(env: &Env, token: &Address, of: &Address) -> i128 {
    token::Client::new(env, token).balance(of)
}

/// Creates a 24-hour activity titled "Test Activity" with choices
/// ["A", "B", "C"] and returns its id.
pub fn create_default_activity(env: &Env, market: &Address, creator: &Address) -> u32 {
    let client = ActivityMarketContractClient::new(env, market);
    let choices: Vec<String> = vec![
        env,
        String::from_str(env, "A"),
        String::from_str(env, "B"),
        String::from_str(env, "C"),
    ];
    client.create_activity(creator, &String::from_str(env, "Test Activity"), &choices, &24)
}

/// Funds and approves a bettor for `bets` fixed-stake bets
pub fn fund_bettor(env: &Env, token: &Address, market: &Address, bettor: &Address, bets: i128) {
    fund(env, token, bettor, bets * STAKE);
    approve(env, token, bettor, market, bets * STAKE);
}
