use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{
    get_stack_height, Instruction, TRANSACTION_LEVEL_STACK_HEIGHT,
};
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked,
};
use anchor_lang::solana_program::{program::invoke_signed, system_instruction};
use anchor_spl::token::{self, MintTo};
use solana_sha256_hasher::hashv;

use crate::errors::RewardsError;

// Ed25519SigVerify111111111111111111111111111
pub fn ed25519_program_id() -> Pubkey {
    Pubkey::new_from_array([
        3, 125, 70, 214, 124, 147, 251, 190, 18, 249, 66, 143, 131, 141, 64, 255,
        5, 112, 116, 73, 39, 244, 138, 100, 252, 202, 112, 68, 128, 0, 0, 0,
    ])
}

// -----------------
// Seeds
// -----------------
pub const CONFIG_SEED: &[u8] = b"config_v1";
pub const AIRDROP_SEED: &[u8] = b"airdrop_v1";
pub const SIGNER_SET_SEED: &[u8] = b"signer_set_v1";
pub const NATIVE_VAULT_SEED: &[u8] = b"native_vault_v1";
pub const LEADERBOARD_SEED: &[u8] = b"leaderboard_v1";

pub const POOL_SEED: &[u8] = b"pool_v1";
pub const PORTFOLIO_SEED: &[u8] = b"portfolio_v1";
pub const ENTITY_SEED: &[u8] = b"entity_v1";
pub const REFERRAL_SEED: &[u8] = b"referral_v1";
pub const USED_SEED_SEED: &[u8] = b"used_seed_v1";
pub const REQUEST_SEED: &[u8] = b"request_v1";

pub fn pool_address(program_id: &Pubkey, season: u64, pool_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[POOL_SEED, &season.to_le_bytes(), &pool_id.to_le_bytes()],
        program_id,
    )
}

pub fn portfolio_address(program_id: &Pubkey, season: u64, owner: &Pubkey, pool_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PORTFOLIO_SEED, &season.to_le_bytes(), owner.as_ref(), &pool_id.to_le_bytes()],
        program_id,
    )
}

pub fn entity_address(program_id: &Pubkey, pool_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ENTITY_SEED, &pool_id.to_le_bytes()], program_id)
}

pub fn request_address(program_id: &Pubkey, request_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[REQUEST_SEED, &request_id.to_le_bytes()], program_id)
}

// -------------------------
// Call-depth guard
// -------------------------

/// User entry points must be top-level instructions, never reached through CPI.
pub fn require_top_level() -> Result<()> {
    require!(
        get_stack_height() <= TRANSACTION_LEVEL_STACK_HEIGHT,
        RewardsError::ReentrantCall
    );
    Ok(())
}

// -------------------------
// Payouts
// -------------------------

/// Lamports out of the system-owned native vault PDA. Zero is a no-op.
pub fn pay_native<'info>(
    native_vault: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    vault_bump: u8,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let ix = system_instruction::transfer(native_vault.key, to.key, amount);
    let signer_seeds: &[&[u8]] = &[NATIVE_VAULT_SEED, &[vault_bump]];

    invoke_signed(
        &ix,
        &[native_vault.clone(), to.clone(), system_program.clone()],
        &[signer_seeds],
    )?;

    Ok(())
}

/// Reward vault credit: mints protocol tokens with the config PDA as authority.
pub fn credit_token<'info>(
    token_program: &AccountInfo<'info>,
    mint: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    config: &AccountInfo<'info>,
    config_bump: u8,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let cfg_seeds: &[&[&[u8]]] = &[&[CONFIG_SEED, &[config_bump]]];

    token::mint_to(
        CpiContext::new_with_signer(
            token_program.clone(),
            MintTo {
                mint: mint.clone(),
                to: to.clone(),
                authority: config.clone(),
            },
            cfg_seeds,
        ),
        amount,
    )
}

// -------------------------
// Manual PDA creation (remaining accounts)
// -------------------------

pub fn create_pda_account<'info>(
    payer: &AccountInfo<'info>,
    target: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    program_id: &Pubkey,
    space: usize,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    require!(
        target.lamports() == 0 && target.data_is_empty(),
        RewardsError::PdaMismatch
    );

    let lamports = Rent::get()?.minimum_balance(space);
    let ix = system_instruction::create_account(
        payer.key,
        target.key,
        lamports,
        space as u64,
        program_id,
    );

    invoke_signed(
        &ix,
        &[payer.clone(), target.clone(), system_program.clone()],
        &[signer_seeds],
    )?;

    Ok(())
}

/// Loads a program-owned account passed through remaining accounts.
pub fn read_account<T: AccountDeserialize>(source: &AccountInfo, program_id: &Pubkey) -> Result<T> {
    require_keys_eq!(*source.owner, *program_id, RewardsError::PdaMismatch);

    let data = source
        .try_borrow_data()
        .map_err(|_| error!(RewardsError::AccountBorrowFailed))?;
    let mut slice: &[u8] = &data;
    T::try_deserialize(&mut slice)
}

pub fn write_account<T: AccountSerialize>(target: &AccountInfo, value: &T) -> Result<()> {
    let mut data = target
        .try_borrow_mut_data()
        .map_err(|_| error!(RewardsError::AccountBorrowFailed))?;

    let mut w = std::io::Cursor::new(&mut data[..]);
    value
        .try_serialize(&mut w)
        .map_err(|_| error!(RewardsError::AccountBorrowFailed))
}

// -------------------------
// Signed messages
// -------------------------

/// Voucher an allowlisted signer issues for a deposit paid off-chain.
pub fn expected_deposit_msg(
    program_id: &Pubkey,
    user: &Pubkey,
    pool_id: u64,
    amount: u64,
    seed: &[u8; 32],
) -> Vec<u8> {
    let mut v = Vec::with_capacity(b"incarnation-rewards:deposit_v1".len() + 32 + 32 + 8 + 8 + 32);
    v.extend_from_slice(b"incarnation-rewards:deposit_v1");
    v.extend_from_slice(program_id.as_ref());
    v.extend_from_slice(user.as_ref());
    v.extend_from_slice(&pool_id.to_le_bytes());
    v.extend_from_slice(&amount.to_le_bytes());
    v.extend_from_slice(seed);
    v
}

pub fn random_words_digest(words: &[u64]) -> [u8; 32] {
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    hashv(&[b"words".as_ref(), bytes.as_ref()]).to_bytes()
}

/// Message the randomness oracle signs when delivering words.
pub fn expected_fulfill_msg(program_id: &Pubkey, request_id: u64, words: &[u64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(b"incarnation-rewards:fulfill_v1".len() + 32 + 8 + 32);
    out.extend_from_slice(b"incarnation-rewards:fulfill_v1");
    out.extend_from_slice(program_id.as_ref());
    out.extend_from_slice(&request_id.to_le_bytes());
    out.extend_from_slice(&random_words_digest(words));
    out
}

// -------------------------
// ed25519 introspection
// -------------------------

/// Reads the single signature of an ed25519 verify instruction whose
/// offsets all point inside the instruction itself.
pub fn parse_ed25519_ix_pubkey_and_msg(ix: &Instruction) -> Result<(Pubkey, Vec<u8>)> {
    require!(
        ix.program_id == ed25519_program_id(),
        RewardsError::MissingOrInvalidEd25519Ix
    );

    let data = &ix.data;
    require!(data.len() >= 16, RewardsError::MissingOrInvalidEd25519Ix);
    require!(data[0] == 1, RewardsError::MissingOrInvalidEd25519Ix);

    let read_u16 = |at: usize| u16::from_le_bytes([data[at], data[at + 1]]);

    let sig_ix = read_u16(4);
    let pk_ix = read_u16(8);
    let msg_ix = read_u16(14);
    require!(
        sig_ix == u16::MAX && pk_ix == u16::MAX && msg_ix == u16::MAX,
        RewardsError::MissingOrInvalidEd25519Ix
    );

    let pk_off = read_u16(6) as usize;
    let msg_off = read_u16(10) as usize;
    let msg_sz = read_u16(12) as usize;

    require!(pk_off + 32 <= data.len(), RewardsError::MissingOrInvalidEd25519Ix);
    require!(msg_off + msg_sz <= data.len(), RewardsError::MissingOrInvalidEd25519Ix);

    let pk_bytes: [u8; 32] = data[pk_off..pk_off + 32]
        .try_into()
        .map_err(|_| error!(RewardsError::MissingOrInvalidEd25519Ix))?;

    Ok((
        Pubkey::new_from_array(pk_bytes),
        data[msg_off..msg_off + msg_sz].to_vec(),
    ))
}

/// Tx layout must be: [ ed25519_verify, <this instruction> ].
pub fn load_preceding_ed25519(instructions_sysvar: &AccountInfo) -> Result<(Pubkey, Vec<u8>)> {
    let current_ix = load_current_index_checked(instructions_sysvar)? as usize;
    require!(current_ix >= 1, RewardsError::MissingOrInvalidEd25519Ix);

    let ed_ix = load_instruction_at_checked(current_ix - 1, instructions_sysvar)
        .map_err(|_| error!(RewardsError::MissingOrInvalidEd25519Ix))?;

    parse_ed25519_ix_pubkey_and_msg(&ed_ix)
}

pub fn assert_signed_by(
    signed: &(Pubkey, Vec<u8>),
    expected_pubkey: &Pubkey,
    expected_msg: &[u8],
) -> Result<()> {
    require_keys_eq!(signed.0, *expected_pubkey, RewardsError::Ed25519PubkeyMismatch);
    require!(signed.1.as_slice() == expected_msg, RewardsError::Ed25519MessageMismatch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ed25519 verify layout:
    /// [num_sigs: u8, padding: u8, offsets(14 bytes), signature(64), pubkey(32), msg(N)]
    /// The signature bytes stay zeroed; only the parser is under test.
    fn make_ed25519_ix(pubkey: [u8; 32], msg: &[u8], sig_ix: u16, pk_ix: u16, msg_ix: u16) -> Instruction {
        let header_len: usize = 16;
        let sig_off = header_len as u16;
        let pk_off = sig_off + 64;
        let msg_off = pk_off + 32;

        let mut data = vec![0u8; header_len + 64 + 32 + msg.len()];
        data[0] = 1;

        let offsets: [u16; 7] = [sig_off, sig_ix, pk_off, pk_ix, msg_off, msg.len() as u16, msg_ix];
        for (i, v) in offsets.iter().enumerate() {
            data[2 + 2 * i..4 + 2 * i].copy_from_slice(&v.to_le_bytes());
        }

        data[pk_off as usize..pk_off as usize + 32].copy_from_slice(&pubkey);
        data[msg_off as usize..].copy_from_slice(msg);

        Instruction {
            program_id: ed25519_program_id(),
            accounts: vec![],
            data,
        }
    }

    #[test]
    fn parses_self_contained_signature() {
        let oracle = Pubkey::new_unique();
        let msg = expected_fulfill_msg(&crate::ID, 42, &[1, 2, 3]);

        let ix = make_ed25519_ix(oracle.to_bytes(), &msg, u16::MAX, u16::MAX, u16::MAX);
        let signed = parse_ed25519_ix_pubkey_and_msg(&ix).expect("should parse");

        assert_eq!(signed.0, oracle);
        assert!(assert_signed_by(&signed, &oracle, &msg).is_ok());
    }

    #[test]
    fn rejects_external_instruction_indices() {
        let k = Pubkey::new_unique();
        for (s, p, m) in [(0, u16::MAX, u16::MAX), (u16::MAX, 3, u16::MAX), (u16::MAX, u16::MAX, 7)] {
            let ix = make_ed25519_ix(k.to_bytes(), b"voucher", s, p, m);
            assert!(parse_ed25519_ix_pubkey_and_msg(&ix).is_err());
        }
    }

    #[test]
    fn rejects_other_programs() {
        let mut ix = make_ed25519_ix(Pubkey::new_unique().to_bytes(), b"x", u16::MAX, u16::MAX, u16::MAX);
        ix.program_id = Pubkey::new_unique();
        assert!(parse_ed25519_ix_pubkey_and_msg(&ix).is_err());
    }

    #[test]
    fn signature_must_match_key_and_message() {
        let signer = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let seed = [9u8; 32];
        let msg = expected_deposit_msg(&crate::ID, &user, 7, 1_000, &seed);

        let ix = make_ed25519_ix(signer.to_bytes(), &msg, u16::MAX, u16::MAX, u16::MAX);
        let signed = parse_ed25519_ix_pubkey_and_msg(&ix).unwrap();

        assert!(assert_signed_by(&signed, &Pubkey::new_unique(), &msg).is_err());
        let other_amount = expected_deposit_msg(&crate::ID, &user, 7, 1_001, &seed);
        assert!(assert_signed_by(&signed, &signer, &other_amount).is_err());
    }

    #[test]
    fn fulfill_message_binds_every_word() {
        let a = expected_fulfill_msg(&crate::ID, 1, &[10, 20]);
        let b = expected_fulfill_msg(&crate::ID, 1, &[10, 21]);
        let c = expected_fulfill_msg(&crate::ID, 2, &[10, 20]);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), b"incarnation-rewards:fulfill_v1".len() + 32 + 8 + 32);
    }

    #[test]
    fn pda_helpers_are_season_scoped() {
        let (p1, _) = pool_address(&crate::ID, 1, 7);
        let (p2, _) = pool_address(&crate::ID, 2, 7);
        assert_ne!(p1, p2);

        let owner = Pubkey::new_unique();
        let (f1, _) = portfolio_address(&crate::ID, 1, &owner, 7);
        let (f2, _) = portfolio_address(&crate::ID, 1, &owner, 8);
        assert_ne!(f1, f2);
    }
}
