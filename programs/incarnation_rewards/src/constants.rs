// Centralized Protocol Constants

// Fixed-point Math
// ================

/// Scaling applied to the per-share accumulators.
/// Large enough that a 1-lamport stake still sees rewards once a pool
/// holds ~10^12 units of value.
pub const SHARE_BASE: u128 = 1_000_000_000_000;

/// Basis-point denominator (10_000 = 100%).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Percentage of every drop folded into the pool accumulator.
/// The remainder goes to the pool's current owner.
pub const DROP_POOL_SHARE_PCT: u64 = 80;
pub const DROP_OWNER_SHARE_PCT: u64 = 20;

/// Fee kept by the protocol when value moves between pools (5%).
pub const SWITCH_FEE_BPS: u64 = 500;

// Airdrop Lottery
// ===============

/// Pools ranked 1..=10 by value receive a drop every execution.
pub const DIRECT_WINNERS: usize = 10;

/// Pools ranked 11..=100 form the raffle band.
pub const RAFFLE_CANDIDATES: usize = 90;

/// Upper bound on raffle draws per execution.
pub const MAX_RAFFLE_WINNERS: usize = 10;

/// Winners credited by one drop at most.
pub const MAX_DROP_WINNERS: usize = DIRECT_WINNERS + MAX_RAFFLE_WINNERS;

/// Winners processed per `perform_upkeep` call; keeps the account list
/// inside a single transaction.
pub const MAX_DROP_CHUNK: usize = 6;

/// Highest native ratio accepted: a full drop can never pay out more than
/// the free native balance.
pub const MAX_NATIVE_DROP_RATIO_BPS: u64 = BPS_DENOMINATOR / MAX_DROP_WINNERS as u64;

/// Random words accepted per fulfillment.
pub const MAX_RANDOM_WORDS: usize = 10;

/// Outstanding (fulfilled, not yet executed) requests tracked at once.
pub const MAX_PENDING_REQUESTS: usize = 16;

/// Interval timestamps are floored to the start of the hour.
pub const SECONDS_PER_HOUR: i64 = 3_600;

// Ranking
// =======

/// Ranks the lottery reads (direct winners + raffle band).
pub const RANK_CAPACITY: usize = DIRECT_WINNERS + RAFFLE_CANDIDATES;

/// Extra entries kept below the ranked window so pools that shrink do not
/// immediately expose ranks the view has lost track of.
pub const RANK_TAIL_BUFFER: usize = 100;

/// Entries stored per leaderboard view.
pub const RANK_STORE_CAPACITY: usize = RANK_CAPACITY + RANK_TAIL_BUFFER;

// Batching
// ========

/// Pool ids accepted by a single claim / pending query.
pub const MAX_BATCH: usize = 16;

/// Voucher signers kept in the allowlist.
pub const MAX_SIGNERS: usize = 16;

// Defaults
// ========

/// Default interval between token drops (1 day).
pub const DEFAULT_TOKEN_DROP_INTERVAL: i64 = 86_400;

/// Default interval between native drops (1 week).
pub const DEFAULT_NATIVE_DROP_INTERVAL: i64 = 604_800;

/// Default share of the free native balance released per winner (0.5%).
pub const DEFAULT_NATIVE_DROP_RATIO_BPS: u16 = 50;

/// Default token drop per winner (100 tokens, assuming 9 decimals).
pub const DEFAULT_TOKEN_DROP_AMOUNT: u64 = 100_000_000_000;

/// Default referral fees (basis points).
pub const DEFAULT_TIER1_FEE_BPS: u16 = 800;
pub const DEFAULT_TIER2_FEE_BPS: u16 = 200;

/// Default minimum paid deposit (0.01 SOL).
pub const DEFAULT_MIN_DEPOSIT: u64 = 10_000_000;

/// Default number of random words requested per cycle.
pub const DEFAULT_NUM_WORDS: u32 = 10;

/// Initial version for account structures.
pub const INITIAL_VERSION: u16 = 1;

/// Season opened by `initialize_config`.
pub const INITIAL_SEASON: u64 = 1;

/// First randomness request id handed out.
pub const INITIAL_REQUEST_ID: u64 = 1;
