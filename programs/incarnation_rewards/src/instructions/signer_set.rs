use anchor_lang::prelude::*;

use crate::{
    constants::{INITIAL_VERSION, MAX_SIGNERS},
    errors::RewardsError,
    state::{Config, SignerSet},
    InitializeSignerSet, ModifySignerSet,
};

pub fn initialize_signer_set(
    ctx: Context<InitializeSignerSet>,
    initial_signers: Vec<Pubkey>,
) -> Result<()> {
    let cfg: &Account<Config> = &ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);

    require!(initial_signers.len() <= MAX_SIGNERS, RewardsError::SignerSetFull);

    // uniqueness + non-default keys
    {
        let mut seen: Vec<Pubkey> = Vec::with_capacity(initial_signers.len());
        for pk in initial_signers.iter() {
            require!(*pk != Pubkey::default(), RewardsError::ZeroAddress);
            require!(!seen.contains(pk), RewardsError::SignerAlreadyExists);
            seen.push(*pk);
        }
    }

    let ss: &mut Account<SignerSet> = &mut ctx.accounts.signer_set;
    ss.admin = cfg.admin;
    ss.bump = ctx.bumps.signer_set;
    ss.signers = initial_signers;
    ss.version = INITIAL_VERSION;

    Ok(())
}

pub fn add_signer(ctx: Context<ModifySignerSet>, signer: Pubkey) -> Result<()> {
    let cfg: &Account<Config> = &ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);

    require!(signer != Pubkey::default(), RewardsError::ZeroAddress);

    let ss: &mut Account<SignerSet> = &mut ctx.accounts.signer_set;

    require!(ss.signers.len() < MAX_SIGNERS, RewardsError::SignerSetFull);
    require!(!ss.signers.contains(&signer), RewardsError::SignerAlreadyExists);

    ss.signers.push(signer);

    Ok(())
}

pub fn remove_signer(ctx: Context<ModifySignerSet>, signer: Pubkey) -> Result<()> {
    let cfg: &Account<Config> = &ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);

    let ss: &mut Account<SignerSet> = &mut ctx.accounts.signer_set;

    let pos = ss
        .signers
        .iter()
        .position(|x| *x == signer)
        .ok_or(RewardsError::SignerNotFound)?;

    // keeps relative order
    ss.signers.remove(pos);

    Ok(())
}
