use anchor_lang::prelude::*;

#[error_code]
pub enum RewardsError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Address must not be the default pubkey")]
    ZeroAddress,
    #[msg("Reward vault already uses this mint")]
    RewardVaultUnchanged,
    #[msg("Math overflow")]
    MathOverflow,
    #[msg("Withdrawal exceeds staked value")]
    StakeUnderflow,

    #[msg("Attached value below the minimum deposit")]
    InsufficientValue,
    #[msg("Invalid pool id")]
    InvalidPoolId,
    #[msg("Too many entries")]
    TooManyEntries,
    #[msg("Account PDA mismatch")]
    PdaMismatch,
    #[msg("Failed to borrow account data")]
    AccountBorrowFailed,
    #[msg("Invalid basis points (must be <= 10000)")]
    InvalidBps,
    #[msg("Native drop ratio too high for a full set of winners")]
    NativeRatioTooHigh,
    #[msg("Invalid interval")]
    InvalidInterval,

    #[msg("Nested invocation of a user entry point")]
    ReentrantCall,

    // -----------------
    // Airdrop lottery
    // -----------------
    #[msg("Drops are disabled")]
    DropsDisabled,
    #[msg("Upkeep action does not match current state")]
    UpkeepNotNeeded,
    #[msg("Unknown or already fulfilled request id")]
    InvalidRequestId,
    #[msg("Request not fulfilled yet")]
    RequestNotFulfilled,
    #[msg("Invalid random words")]
    InvalidRandomWords,
    #[msg("Pending request tracker is full")]
    TrackerFull,
    #[msg("Winner accounts do not match the drop winners")]
    WinnerAccountsMismatch,
    #[msg("Randomness oracle not set")]
    OracleNotSet,
    #[msg("Drop execution chunk is empty or too large")]
    InvalidDropChunk,

    // -----------------
    // Signed deposits
    // -----------------
    #[msg("Missing or invalid ed25519 verify instruction")]
    MissingOrInvalidEd25519Ix,
    #[msg("Ed25519 pubkey mismatch")]
    Ed25519PubkeyMismatch,
    #[msg("Ed25519 message mismatch")]
    Ed25519MessageMismatch,
    #[msg("Signer is not allowlisted")]
    SignerNotAllowed,
    #[msg("Deposit seed already used")]
    SeedAlreadyUsed,

    // -----------------
    // SignerSet
    // -----------------
    #[msg("SignerSet is full")]
    SignerSetFull,
    #[msg("Signer already exists in allowlist")]
    SignerAlreadyExists,
    #[msg("Signer not found in allowlist")]
    SignerNotFound,

    // -----------------
    // Referral
    // -----------------
    #[msg("Referrer account does not match record")]
    ReferrerMismatch,

    #[msg("Token account required to receive token rewards")]
    MissingTokenAccount,

    #[msg("Insufficient vault funds")]
    InsufficientVaultFunds,
}
