use anchor_lang::prelude::*;

use crate::{
    errors::RewardsError,
    events::DropClaimed,
    ledger::{self, Rewards},
    state::{AirdropState, Pool, Portfolio, RewardKind},
    utils::{credit_token, pay_native},
};

/// Which streams a settlement pays out.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimMode {
    Both,
    NativeOnly,
    TokenOnly,
}

impl ClaimMode {
    pub fn includes(&self, kind: RewardKind) -> bool {
        match self {
            ClaimMode::Both => true,
            ClaimMode::NativeOnly => kind == RewardKind::Native,
            ClaimMode::TokenOnly => kind == RewardKind::Token,
        }
    }
}

/// Accounts needed to move rewards out of the native vault and the reward vault.
pub struct Payout<'info> {
    pub config: AccountInfo<'info>,
    pub config_bump: u8,
    pub native_vault: AccountInfo<'info>,
    pub native_vault_bump: u8,
    pub token_mint: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub system_program: AccountInfo<'info>,
}

impl<'info> Payout<'info> {
    pub fn native(&self, to: &AccountInfo<'info>, amount: u64) -> Result<()> {
        pay_native(
            &self.native_vault,
            to,
            &self.system_program,
            self.native_vault_bump,
            amount,
        )
    }

    pub fn token(&self, to: Option<&AccountInfo<'info>>, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let to = to.ok_or_else(|| error!(RewardsError::MissingTokenAccount))?;

        credit_token(
            &self.token_program,
            &self.token_mint,
            to,
            &self.config,
            self.config_bump,
            amount,
        )
    }

    /// Pays `rewards` to `user` and releases the native part from the
    /// committed liabilities.
    pub fn pay(
        &self,
        airdrop: &mut AirdropState,
        user: &AccountInfo<'info>,
        user_token_account: Option<&AccountInfo<'info>>,
        rewards: Rewards,
    ) -> Result<()> {
        self.native(user, rewards.native)?;
        self.token(user_token_account, rewards.token)?;

        airdrop.native_committed = airdrop.native_committed.saturating_sub(rewards.native);
        Ok(())
    }
}

/// Settles the streams selected by `mode` and emits one `DropClaimed` per
/// stream. Native claims of zero are silent; token claims always log.
pub fn settle_streams(
    pool: &Pool,
    portfolio: &mut Portfolio,
    mode: ClaimMode,
    account: Pubkey,
) -> Result<Rewards> {
    let mut out = Rewards::default();

    if mode.includes(RewardKind::Native) {
        out.native = ledger::settle_stream(pool, portfolio, RewardKind::Native)?;
        if out.native > 0 {
            emit!(DropClaimed {
                kind: RewardKind::Native,
                account,
                pool_id: pool.pool_id,
                amount: out.native,
            });
        }
    }

    if mode.includes(RewardKind::Token) {
        out.token = ledger::settle_stream(pool, portfolio, RewardKind::Token)?;
        emit!(DropClaimed {
            kind: RewardKind::Token,
            account,
            pool_id: pool.pool_id,
            amount: out.token,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_modes_select_streams() {
        assert!(ClaimMode::Both.includes(RewardKind::Native));
        assert!(ClaimMode::Both.includes(RewardKind::Token));
        assert!(ClaimMode::NativeOnly.includes(RewardKind::Native));
        assert!(!ClaimMode::NativeOnly.includes(RewardKind::Token));
        assert!(!ClaimMode::TokenOnly.includes(RewardKind::Native));
    }
}
