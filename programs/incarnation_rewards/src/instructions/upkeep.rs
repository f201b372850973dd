use anchor_lang::prelude::*;

use crate::{
    errors::RewardsError,
    events::{DropExecuted, RandomnessRequested},
    ledger,
    lottery::{self, UpkeepAction, UpkeepCheck},
    state::{EntityRecord, Pool, Portfolio, RandomnessRequest, RewardKind},
    utils::{
        create_pda_account, entity_address, pool_address, portfolio_address, read_account,
        request_address, write_account, PORTFOLIO_SEED, REQUEST_SEED,
    },
    CheckUpkeep, PerformUpkeep,
};

pub fn check_upkeep(ctx: Context<CheckUpkeep>) -> Result<UpkeepCheck> {
    let now = Clock::get()?.unix_timestamp;
    Ok(lottery::check_upkeep(&ctx.accounts.airdrop, now))
}

/// Periodic trigger. `action` must be exactly what `check_upkeep` reports now.
pub fn perform_upkeep<'info>(
    ctx: Context<'_, '_, 'info, 'info, PerformUpkeep<'info>>,
    action: UpkeepAction,
) -> Result<()> {
    require!(ctx.accounts.airdrop.conf.enabled, RewardsError::DropsDisabled);
    let now = Clock::get()?.unix_timestamp;

    let check = lottery::check_upkeep(&ctx.accounts.airdrop, now);
    require!(check.due && check.action == action, RewardsError::UpkeepNotNeeded);

    match action {
        UpkeepAction::None => err!(RewardsError::UpkeepNotNeeded),
        UpkeepAction::RequestToken => request_randomness(ctx, RewardKind::Token, now),
        UpkeepAction::RequestNative => request_randomness(ctx, RewardKind::Native, now),
        UpkeepAction::ExecuteToken { request_id } => {
            execute_drop(ctx, request_id, RewardKind::Token, now)
        }
        UpkeepAction::ExecuteNative { request_id } => {
            execute_drop(ctx, request_id, RewardKind::Native, now)
        }
    }
}

fn request_randomness<'info>(
    ctx: Context<'_, '_, 'info, 'info, PerformUpkeep<'info>>,
    kind: RewardKind,
    now: i64,
) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(cfg.randomness_oracle != Pubkey::default(), RewardsError::OracleNotSet);

    let airdrop = &mut ctx.accounts.airdrop;
    let request_id = airdrop.next_request_id;

    // --- create the request PDA ---
    let request_ai = ctx.accounts.request.to_account_info();
    let (expected_pda, bump) = request_address(ctx.program_id, request_id);
    require_keys_eq!(expected_pda, request_ai.key(), RewardsError::PdaMismatch);

    let id_le = request_id.to_le_bytes();
    create_pda_account(
        &ctx.accounts.cranker.to_account_info(),
        &request_ai,
        &ctx.accounts.system_program.to_account_info(),
        ctx.program_id,
        8 + RandomnessRequest::INIT_SPACE,
        &[REQUEST_SEED, &id_le, &[bump]],
    )?;

    let rc = cfg.randomness;
    write_account(
        &request_ai,
        &RandomnessRequest {
            request_id,
            bump,
            kind,
            exists: true,
            fulfilled: false,
            executed: false,
            num_words: rc.num_words,
            random_words: Vec::new(),
            requested_at: now,
            fulfilled_at: 0,
            executed_at: 0,
            started: false,
            season: 0,
            amount: 0,
            native_budget: 0,
            winners: Vec::new(),
            cursor: 0,
        },
    )?;

    airdrop.next_request_id = request_id
        .checked_add(1)
        .ok_or(RewardsError::MathOverflow)?;
    lottery::mark_requested(&mut airdrop.conf, kind, now);

    msg!(
        "randomness requested: id {} kind {:?} words {} confirmations {} sub {}",
        request_id,
        kind,
        rc.num_words,
        rc.request_confirmations,
        rc.subscription_id
    );
    emit!(RandomnessRequested {
        request_id,
        kind,
        key_hash: rc.key_hash,
        subscription_id: rc.subscription_id,
        callback_compute_limit: rc.callback_compute_limit,
        request_confirmations: rc.request_confirmations,
        num_words: rc.num_words,
    });

    Ok(())
}

/// Executes a fulfilled drop, a few winners per call. The first call fixes
/// the winner list, the season and the amounts on the request; the tracker
/// entry is released by the call that credits the last winner.
///
/// remaining_accounts: [pool, entity, owner_portfolio] for each winner of
/// this chunk, in the order of `request.winners` from `request.cursor`.
fn execute_drop<'info>(
    ctx: Context<'_, '_, 'info, 'info, PerformUpkeep<'info>>,
    request_id: u64,
    kind: RewardKind,
    now: i64,
) -> Result<()> {
    // --- request ---
    let request_ai = ctx.accounts.request.to_account_info();
    let (expected_pda, _) = request_address(ctx.program_id, request_id);
    require_keys_eq!(expected_pda, request_ai.key(), RewardsError::PdaMismatch);

    let mut request: RandomnessRequest = read_account(&request_ai, ctx.program_id)?;
    require!(request.request_id == request_id, RewardsError::InvalidRequestId);
    require!(request.kind == kind, RewardsError::InvalidRequestId);
    require!(request.fulfilled && !request.executed, RewardsError::RequestNotFulfilled);

    let free = match kind {
        RewardKind::Native => lottery::free_native_balance(
            ctx.accounts.native_vault.to_account_info().lamports(),
            Rent::get()?.minimum_balance(0),
            ctx.accounts.airdrop.native_committed,
        ),
        RewardKind::Token => 0,
    };

    if !request.started {
        let winners =
            lottery::select_winners(&ctx.accounts.leaderboard.by_value, &request.random_words);
        let amount = lottery::drop_amount(&ctx.accounts.airdrop.conf, kind, free);

        request.started = true;
        request.season = ctx.accounts.config.season;
        request.amount = amount;
        request.native_budget = free;
        request.winners = winners.all();
        request.cursor = 0;

        msg!(
            "executing drop: request {} kind {:?} direct {} raffle {} amount {}",
            request_id,
            kind,
            winners.direct.len(),
            winners.raffle.len(),
            amount
        );
    } else if kind == RewardKind::Native {
        // the vault may have been drawn down since the last chunk
        request.native_budget = request.native_budget.min(free);
    }

    let chunk = lottery::drop_chunk(
        request.cursor as usize,
        request.winners.len(),
        ctx.remaining_accounts.len(),
    )?;

    let season = request.season;
    let season_le = season.to_le_bytes();
    let portfolio_space = 8 + Portfolio::INIT_SPACE;
    let airdrop = &mut ctx.accounts.airdrop;

    for (slot, i) in chunk.clone().enumerate() {
        let pool_id = request.winners[i];
        let pool_ai = &ctx.remaining_accounts[3 * slot];
        let entity_ai = &ctx.remaining_accounts[3 * slot + 1];
        let owner_ai = &ctx.remaining_accounts[3 * slot + 2];

        let (expected_pool, _) = pool_address(ctx.program_id, season, pool_id);
        require_keys_eq!(pool_ai.key(), expected_pool, RewardsError::WinnerAccountsMismatch);
        let (expected_entity, _) = entity_address(ctx.program_id, pool_id);
        require_keys_eq!(entity_ai.key(), expected_entity, RewardsError::WinnerAccountsMismatch);

        let mut pool: Pool = read_account(pool_ai, ctx.program_id)?;
        if pool.total_value == 0 {
            msg!("pool {} has no value, skipped", pool_id);
            continue;
        }

        let amount = match kind {
            RewardKind::Native => lottery::take_budget(&mut request.native_budget, request.amount),
            RewardKind::Token => request.amount,
        };
        if amount == 0 {
            msg!("native budget exhausted, pool {} skipped", pool_id);
            continue;
        }

        let entity: EntityRecord = read_account(entity_ai, ctx.program_id)?;
        let pool_le = pool_id.to_le_bytes();
        let (expected_owner_pf, owner_bump) =
            portfolio_address(ctx.program_id, season, &entity.owner, pool_id);
        require_keys_eq!(owner_ai.key(), expected_owner_pf, RewardsError::WinnerAccountsMismatch);

        // owners without a portfolio in this pool get one, paid by the cranker
        let mut owner_portfolio: Portfolio = if owner_ai.data_is_empty() {
            create_pda_account(
                &ctx.accounts.cranker.to_account_info(),
                owner_ai,
                &ctx.accounts.system_program.to_account_info(),
                ctx.program_id,
                portfolio_space,
                &[PORTFOLIO_SEED, &season_le, entity.owner.as_ref(), &pool_le, &[owner_bump]],
            )?;
            Portfolio {
                owner: entity.owner,
                pool_id,
                season,
                bump: owner_bump,
                ..Portfolio::default()
            }
        } else {
            read_account(owner_ai, ctx.program_id)?
        };

        let split = ledger::credit_drop(&mut pool, &mut owner_portfolio, amount, kind)?;
        pool.last_updated = now;

        write_account(pool_ai, &pool)?;
        write_account(owner_ai, &owner_portfolio)?;

        if kind == RewardKind::Native {
            airdrop.native_committed = airdrop
                .native_committed
                .checked_add(split.payable)
                .ok_or(RewardsError::MathOverflow)?;
        }

        emit!(DropExecuted {
            kind,
            pool_id,
            request_id,
            pool_share: split.pool_share,
            owner: entity.owner,
            owner_bonus: split.owner_bonus,
        });
    }

    request.cursor = chunk.end as u8;
    if chunk.end == request.winners.len() {
        airdrop.remove_pending(request_id);
        request.executed = true;
        request.executed_at = now;
        msg!("drop {} complete", request_id);
    } else {
        msg!(
            "drop {} progressed to {}/{}",
            request_id,
            chunk.end,
            request.winners.len()
        );
    }
    write_account(&request_ai, &request)?;

    Ok(())
}
