//! Core contract implementation for the Activity Betting Market.

use soroban_sdk::{contract, contractimpl, token, Address, Env, String, Vec};

use crate::errors::ContractError;
use crate::types::{Activity, DataKey, Ticket, MAX_CHOICE_LEN, NO_WINNING_CHOICE};

#[contract]
pub struct ActivityMarketContract;

#[contractimpl]
impl ActivityMarketContract {
    /// Initializes the contract with the stake token and the fixed stake
    /// amount pulled per bet (one-time only)
    pub fn initialize(env: Env, token: Address, stake_amount: i128) -> Result<(), ContractError> {
        if stake_amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        if env.storage().persistent().has(&DataKey::Token) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().persistent().set(&DataKey::Token, &token);
        env.storage().persistent().set(&DataKey::StakeAmount, &stake_amount);

        Ok(())
    }

    pub fn get_token(env: Env) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Token)
    }

    pub fn get_stake_amount(env: Env) -> Option<i128> {
        env.storage().persistent().get(&DataKey::StakeAmount)
    }

    /// Creates a new activity and returns its sequential id.
    /// No token movement; the pool starts empty.
    pub fn create_activity(
        env: Env,
        creator: Address,
        title: String,
        choices: Vec<String>,
        duration_hours: u64,
    ) -> Result<u32, ContractError> {
        creator.require_auth();

        if title.len() == 0 {
            return Err(ContractError::InvalidInput);
        }

        Self::_validate_choices(&choices)?;

        if duration_hours == 0 {
            return Err(ContractError::InvalidInput);
        }

        let duration_secs = duration_hours
            .checked_mul(3600)
            .ok_or(ContractError::Overflow)?;
        let end_time = env
            .ledger()
            .timestamp()
            .checked_add(duration_secs)
            .ok_or(ContractError::Overflow)?;

        let activity_id: u32 = env
            .storage()
            .persistent()
            .get(&DataKey::ActivityCount)
            .unwrap_or(0);

        let activity = Activity {
            creator,
            title,
            choices,
            end_time,
            total_pool: 0,
            is_settled: false,
            winning_choice: 0,
            ticket_ids: Vec::new(&env),
        };

        env.storage().persistent().set(&DataKey::Activity(activity_id), &activity);
        env.storage().persistent().set(
            &DataKey::ActivityCount,
            &activity_id.checked_add(1).ok_or(ContractError::Overflow)?,
        );

        Ok(activity_id)
    }

    /// Returns the activity with the given id
    pub fn get_activity(env: Env, activity_id: u32) -> Result<Activity, ContractError> {
        Self::_load_activity(&env, activity_id)
    }

    /// Returns the number of activities ever created
    pub fn get_activities_count(env: Env) -> u32 {
        env.storage().persistent().get(&DataKey::ActivityCount).unwrap_or(0)
    }

    /// Places the fixed stake on a choice of an open activity and mints a
    /// ticket for it. The stake is pulled from the bettor into escrow via
    /// the token's allowance; any transfer failure aborts the whole
    /// operation with no ticket minted and no pool change.
    pub fn place_bet(
        env: Env,
        bettor: Address,
        activity_id: u32,
        choice: u32,
    ) -> Result<u32, ContractError> {
        bettor.require_auth();

        let mut activity = Self::_load_activity(&env, activity_id)?;

        if activity.is_settled {
            return Err(ContractError::InvalidState);
        }
        if env.ledger().timestamp() >= activity.end_time {
            return Err(ContractError::InvalidState);
        }
        if choice >= activity.choices.len() {
            return Err(ContractError::InvalidInput);
        }

        let stake = Self::_stake_amount(&env)?;
        let token = token::Client::new(&env, &Self::_token(&env)?);
        let escrow = env.current_contract_address();

        if token.balance(&bettor) < stake {
            return Err(ContractError::InsufficientFunds);
        }
        if token.allowance(&bettor, &escrow) < stake {
            return Err(ContractError::InsufficientAllowance);
        }

        token.transfer_from(&escrow, &bettor, &escrow, &stake);

        let ticket_id: u32 = env
            .storage()
            .persistent()
            .get(&DataKey::TicketCount)
            .unwrap_or(0);

        let ticket = Ticket {
            activity_id,
            choice,
            purchase_price: stake,
            owner: bettor,
            is_listed: false,
            list_price: 0,
        };

        env.storage().persistent().set(&DataKey::Ticket(ticket_id), &ticket);
        env.storage().persistent().set(
            &DataKey::TicketCount,
            &ticket_id.checked_add(1).ok_or(ContractError::Overflow)?,
        );

        activity.ticket_ids.push_back(ticket_id);
        activity.total_pool = activity
            .total_pool
            .checked_add(stake)
            .ok_or(ContractError::Overflow)?;
        env.storage().persistent().set(&DataKey::Activity(activity_id), &activity);

        Ok(ticket_id)
    }

    /// Returns the ticket with the given id
    pub fn get_ticket(env: Env, ticket_id: u32) -> Result<Ticket, ContractError> {
        Self::_load_ticket(&env, ticket_id)
    }

    /// Returns the number of tickets ever minted
    pub fn get_tickets_count(env: Env) -> u32 {
        env.storage().persistent().get(&DataKey::TicketCount).unwrap_or(0)
    }

    /// Brings the activity's end time forward to now (creator only).
    /// Irreversible; betting stops immediately.
    pub fn early_close_activity(
        env: Env,
        caller: Address,
        activity_id: u32,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let mut activity = Self::_load_activity(&env, activity_id)?;

        if caller != activity.creator {
            return Err(ContractError::Unauthorized);
        }
        if activity.is_settled {
            return Err(ContractError::InvalidState);
        }

        let now = env.ledger().timestamp();
        if now >= activity.end_time {
            return Err(ContractError::InvalidState);
        }

        activity.end_time = now;
        env.storage().persistent().set(&DataKey::Activity(activity_id), &activity);

        Ok(())
    }

    /// Settles an ended activity with the winning choice (creator only).
    /// Each winning ticket's current owner receives
    /// `total_pool * purchase_price / winning_stake`, truncated; the
    /// accumulated truncation remainder goes to the last winner in
    /// ticket-id order so the payouts sum to the pool exactly.
    pub fn settle_activity(
        env: Env,
        caller: Address,
        activity_id: u32,
        winning_choice: u32,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let mut activity = Self::_load_activity(&env, activity_id)?;

        if caller != activity.creator {
            return Err(ContractError::Unauthorized);
        }
        if activity.is_settled {
            return Err(ContractError::InvalidState);
        }
        if env.ledger().timestamp() < activity.end_time {
            return Err(ContractError::InvalidState);
        }
        if winning_choice >= activity.choices.len() {
            return Err(ContractError::InvalidInput);
        }

        let mut winners: Vec<u32> = Vec::new(&env);
        let mut winning_stake: i128 = 0;

        for i in 0..activity.ticket_ids.len() {
            if let Some(ticket_id) = activity.ticket_ids.get(i) {
                let ticket = Self::_load_ticket(&env, ticket_id)?;
                if ticket.choice == winning_choice {
                    winning_stake = winning_stake
                        .checked_add(ticket.purchase_price)
                        .ok_or(ContractError::Overflow)?;
                    winners.push_back(ticket_id);
                }
            }
        }

        if winning_stake == 0 {
            return Err(ContractError::NoWinningStake);
        }

        let token = token::Client::new(&env, &Self::_token(&env)?);
        let escrow = env.current_contract_address();
        let pool = activity.total_pool;
        let mut distributed: i128 = 0;

        for i in 0..winners.len() {
            if let Some(ticket_id) = winners.get(i) {
                let ticket = Self::_load_ticket(&env, ticket_id)?;

                let payout = if i == winners.len() - 1 {
                    // Last winner absorbs the truncation remainder
                    pool.checked_sub(distributed).ok_or(ContractError::Overflow)?
                } else {
                    pool.checked_mul(ticket.purchase_price)
                        .ok_or(ContractError::Overflow)?
                        / winning_stake
                };

                if payout > 0 {
                    token.transfer(&escrow, &ticket.owner, &payout);
                }

                distributed = distributed
                    .checked_add(payout)
                    .ok_or(ContractError::Overflow)?;
            }
        }

        activity.is_settled = true;
        activity.winning_choice = winning_choice;
        activity.total_pool = 0;
        env.storage().persistent().set(&DataKey::Activity(activity_id), &activity);

        Ok(())
    }

    /// Cancels an unsettled activity and refunds every ticket's purchase
    /// price to its current owner (creator only). Refunds follow resales:
    /// a resold ticket refunds its buyer, not the original bettor.
    pub fn cancel_activity(env: Env, caller: Address, activity_id: u32) -> Result<(), ContractError> {
        caller.require_auth();

        let mut activity = Self::_load_activity(&env, activity_id)?;

        if caller != activity.creator {
            return Err(ContractError::Unauthorized);
        }
        if activity.is_settled {
            return Err(ContractError::InvalidState);
        }

        let token = token::Client::new(&env, &Self::_token(&env)?);
        let escrow = env.current_contract_address();

        for i in 0..activity.ticket_ids.len() {
            if let Some(ticket_id) = activity.ticket_ids.get(i) {
                let ticket = Self::_load_ticket(&env, ticket_id)?;
                token.transfer(&escrow, &ticket.owner, &ticket.purchase_price);
            }
        }

        activity.is_settled = true;
        activity.winning_choice = NO_WINNING_CHOICE;
        activity.total_pool = 0;
        env.storage().persistent().set(&DataKey::Activity(activity_id), &activity);

        Ok(())
    }

    /// Lists a ticket for resale at the given price (owner only).
    /// Relisting an already-listed ticket updates the price.
    pub fn list_ticket(
        env: Env,
        caller: Address,
        ticket_id: u32,
        price: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let mut ticket = Self::_load_ticket(&env, ticket_id)?;

        if caller != ticket.owner {
            return Err(ContractError::Unauthorized);
        }
        if price <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let activity = Self::_load_activity(&env, ticket.activity_id)?;
        if activity.is_settled {
            return Err(ContractError::InvalidState);
        }

        ticket.is_listed = true;
        ticket.list_price = price;
        env.storage().persistent().set(&DataKey::Ticket(ticket_id), &ticket);

        Ok(())
    }

    /// Withdraws a ticket's resale listing (owner only)
    pub fn cancel_listing(env: Env, caller: Address, ticket_id: u32) -> Result<(), ContractError> {
        caller.require_auth();

        let mut ticket = Self::_load_ticket(&env, ticket_id)?;

        if caller != ticket.owner {
            return Err(ContractError::Unauthorized);
        }
        if !ticket.is_listed {
            return Err(ContractError::InvalidState);
        }

        ticket.is_listed = false;
        ticket.list_price = 0;
        env.storage().persistent().set(&DataKey::Ticket(ticket_id), &ticket);

        Ok(())
    }

    /// Buys a listed ticket, paying the seller directly (peer-to-peer,
    /// not through escrow) and taking over the stake and its future
    /// payout rights. Any transfer failure aborts with no ownership
    /// change.
    pub fn buy_ticket(env: Env, buyer: Address, ticket_id: u32) -> Result<(), ContractError> {
        buyer.require_auth();

        let mut ticket = Self::_load_ticket(&env, ticket_id)?;

        if !ticket.is_listed {
            return Err(ContractError::InvalidState);
        }
        if buyer == ticket.owner {
            return Err(ContractError::InvalidInput);
        }

        let activity = Self::_load_activity(&env, ticket.activity_id)?;
        if activity.is_settled {
            return Err(ContractError::InvalidState);
        }

        let price = ticket.list_price;
        let token = token::Client::new(&env, &Self::_token(&env)?);
        let spender = env.current_contract_address();

        if token.balance(&buyer) < price {
            return Err(ContractError::InsufficientFunds);
        }
        if token.allowance(&buyer, &spender) < price {
            return Err(ContractError::InsufficientAllowance);
        }

        token.transfer_from(&spender, &buyer, &ticket.owner, &price);

        ticket.owner = buyer;
        ticket.is_listed = false;
        ticket.list_price = 0;
        env.storage().persistent().set(&DataKey::Ticket(ticket_id), &ticket);

        Ok(())
    }

    fn _load_activity(env: &Env, activity_id: u32) -> Result<Activity, ContractError> {
        env.storage()
            .persistent()
            .get(&DataKey::Activity(activity_id))
            .ok_or(ContractError::NotFound)
    }

    fn _load_ticket(env: &Env, ticket_id: u32) -> Result<Ticket, ContractError> {
        env.storage()
            .persistent()
            .get(&DataKey::Ticket(ticket_id))
            .ok_or(ContractError::NotFound)
    }

    fn _token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .persistent()
            .get(&DataKey::Token)
            .ok_or(ContractError::NotInitialized)
    }

    fn _stake_amount(env: &Env) -> Result<i128, ContractError> {
        env.storage()
            .persistent()
            .get(&DataKey::StakeAmount)
            .ok_or(ContractError::NotInitialized)
    }

    /// Rejects fewer than two choices, empty or oversized labels, and
    /// case-insensitive duplicates
    fn _validate_choices(choices: &Vec<String>) -> Result<(), ContractError> {
        if choices.len() < 2 {
            return Err(ContractError::InvalidInput);
        }

        for i in 0..choices.len() {
            if let Some(choice) = choices.get(i) {
                if choice.len() == 0 || choice.len() > MAX_CHOICE_LEN {
                    return Err(ContractError::InvalidInput);
                }
            }
        }

        for i in 0..choices.len() {
            for j in (i + 1)..choices.len() {
                if let (Some(a), Some(b)) = (choices.get(i), choices.get(j)) {
                    if Self::_eq_ignore_ascii_case(&a, &b) {
                        return Err(ContractError::InvalidInput);
                    }
                }
            }
        }

        Ok(())
    }

    /// Byte-wise ASCII case-insensitive comparison of two host strings.
    /// Callers must have validated both lengths against MAX_CHOICE_LEN.
    fn _eq_ignore_ascii_case(a: &String, b: &String) -> bool {
        if a.len() != b.len() {
            return false;
        }

        let len = a.len() as usize;
        let mut buf_a = [0u8; MAX_CHOICE_LEN as usize];
        let mut buf_b = [0u8; MAX_CHOICE_LEN as usize];
        a.copy_into_slice(&mut buf_a[..len]);
        b.copy_into_slice(&mut buf_b[..len]);

        buf_a[..len].eq_ignore_ascii_case(&buf_b[..len])
    }
}
