pub mod event;
pub mod event_type;
pub mod ledger;
pub mod user;
pub mod withdrawal;
pub mod yellow_card;

pub use event::Event;
pub use event_type::EventType;
pub use ledger::{ConfigRecord, Ledger};
pub use user::UserRecord;
pub use withdrawal::{WithdrawalRequest, WithdrawalStatus};
pub use yellow_card::{CardKind, YellowCard};
