pub mod admin;
pub mod claim;
pub mod deposit;
pub mod oracle;
pub mod payout;
pub mod registry;
pub mod signer_set;
pub mod switch;
pub mod upkeep;
pub mod views;

pub use payout::ClaimMode;
pub use views::Referrers;
