use anchor_lang::prelude::*;

use crate::{errors::RewardsError, RecordScore, SetEntityOwner};

/// Mirrors an ownership change from the entity registry.
pub fn set_entity_owner(ctx: Context<SetEntityOwner>, pool_id: u64, owner: Pubkey) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(cfg.registry_authority != Pubkey::default(), RewardsError::Unauthorized);
    require_keys_eq!(
        cfg.registry_authority,
        ctx.accounts.authority.key(),
        RewardsError::Unauthorized
    );

    require!(pool_id != 0, RewardsError::InvalidPoolId);
    require!(owner != Pubkey::default(), RewardsError::ZeroAddress);

    let entity = &mut ctx.accounts.entity;
    entity.pool_id = pool_id;
    entity.owner = owner;
    entity.bump = ctx.bumps.entity;
    entity.updated_at = Clock::get()?.unix_timestamp;

    Ok(())
}

pub fn record_score(ctx: Context<RecordScore>, pool_id: u64, score: u64) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require_keys_eq!(
        cfg.registry_authority,
        ctx.accounts.authority.key(),
        RewardsError::Unauthorized
    );
    require!(pool_id != 0, RewardsError::InvalidPoolId);

    ctx.accounts.leaderboard.record_score(pool_id, score);

    Ok(())
}
