use anchor_lang::prelude::*;

use crate::{
    constants::MAX_RANDOM_WORDS,
    errors::RewardsError,
    events::RandomnessFulfilled,
    state::{AirdropState, PendingRequest, RandomnessRequest},
    utils::{assert_signed_by, expected_fulfill_msg, load_preceding_ed25519},
    FulfillRandomWords,
};

#[cfg(feature = "mock-randomness")]
use crate::FulfillRandomWordsMock;

/// Stores the words on a known, unfulfilled request and queues it for execution.
pub(crate) fn record_fulfillment(
    airdrop: &mut AirdropState,
    request: &mut RandomnessRequest,
    request_id: u64,
    random_words: Vec<u64>,
    now: i64,
) -> Result<()> {
    require!(request.request_id == request_id, RewardsError::InvalidRequestId);
    require!(request.exists, RewardsError::InvalidRequestId);
    require!(!request.fulfilled, RewardsError::InvalidRequestId);

    require!(
        !random_words.is_empty() && random_words.len() <= MAX_RANDOM_WORDS,
        RewardsError::InvalidRandomWords
    );

    airdrop.insert_pending(PendingRequest {
        request_id,
        kind: request.kind,
    })?;

    request.num_words = random_words.len() as u32;
    request.random_words = random_words;
    request.fulfilled = true;
    request.fulfilled_at = now;

    msg!(
        "randomness fulfilled: request {} ({} words)",
        request_id,
        request.num_words
    );
    emit!(RandomnessFulfilled {
        request_id,
        kind: request.kind,
        num_words: request.num_words,
    });

    Ok(())
}

// Tx layout must be: [ ed25519_verify(randomness oracle), fulfill_random_words ]
pub fn fulfill_random_words(
    ctx: Context<FulfillRandomWords>,
    request_id: u64,
    random_words: Vec<u64>,
) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(cfg.randomness_oracle != Pubkey::default(), RewardsError::OracleNotSet);

    // --- ed25519 introspection ---
    let signed = load_preceding_ed25519(&ctx.accounts.instructions.to_account_info())?;
    let expected = expected_fulfill_msg(ctx.program_id, request_id, &random_words);
    assert_signed_by(&signed, &cfg.randomness_oracle, expected.as_slice())?;

    let now = Clock::get()?.unix_timestamp;
    record_fulfillment(
        &mut ctx.accounts.airdrop,
        &mut ctx.accounts.request,
        request_id,
        random_words,
        now,
    )
}

#[cfg(feature = "mock-randomness")]
pub fn fulfill_random_words_mock(
    ctx: Context<FulfillRandomWordsMock>,
    request_id: u64,
    random_words: Vec<u64>,
) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);

    let now = Clock::get()?.unix_timestamp;
    record_fulfillment(
        &mut ctx.accounts.airdrop,
        &mut ctx.accounts.request,
        request_id,
        random_words,
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AirdropConf, RewardKind};

    fn airdrop() -> AirdropState {
        AirdropState {
            bump: 255,
            conf: AirdropConf::default(),
            next_request_id: 2,
            native_committed: 0,
            pending: Vec::new(),
            version: 1,
        }
    }

    fn request(id: u64) -> RandomnessRequest {
        RandomnessRequest {
            request_id: id,
            bump: 255,
            kind: RewardKind::Token,
            exists: true,
            fulfilled: false,
            executed: false,
            num_words: 10,
            random_words: Vec::new(),
            requested_at: 100,
            fulfilled_at: 0,
            executed_at: 0,
            started: false,
            season: 1,
            amount: 0,
            native_budget: 0,
            winners: Vec::new(),
            cursor: 0,
        }
    }

    #[test]
    fn fulfillment_enqueues_request() {
        let mut a = airdrop();
        let mut r = request(1);

        record_fulfillment(&mut a, &mut r, 1, vec![7, 8, 9], 200).unwrap();

        assert!(r.fulfilled);
        assert_eq!(r.num_words, 3);
        assert_eq!(r.fulfilled_at, 200);
        assert_eq!(a.pending_at(0), Some(PendingRequest { request_id: 1, kind: RewardKind::Token }));
    }

    #[test]
    fn second_fulfillment_is_rejected() {
        let mut a = airdrop();
        let mut r = request(1);
        record_fulfillment(&mut a, &mut r, 1, vec![1], 200).unwrap();

        assert!(record_fulfillment(&mut a, &mut r, 1, vec![2], 300).is_err());
        assert_eq!(r.random_words, vec![1]);
        assert_eq!(a.pending_len(), 1);
    }

    #[test]
    fn unknown_request_is_rejected() {
        let mut a = airdrop();
        let mut r = request(1);
        r.exists = false;
        assert!(record_fulfillment(&mut a, &mut r, 1, vec![1], 200).is_err());

        let mut r = request(1);
        assert!(record_fulfillment(&mut a, &mut r, 2, vec![1], 200).is_err());
        assert_eq!(a.pending_len(), 0);
    }

    #[test]
    fn word_count_is_bounded() {
        let mut a = airdrop();
        assert!(record_fulfillment(&mut a, &mut request(1), 1, vec![], 200).is_err());
        assert!(record_fulfillment(&mut a, &mut request(1), 1, vec![0; MAX_RANDOM_WORDS + 1], 200).is_err());
        assert!(record_fulfillment(&mut a, &mut request(1), 1, vec![0; MAX_RANDOM_WORDS], 200).is_ok());
    }
}
