pub mod attendance;
pub mod backup;
pub mod clock;
pub mod credits;
pub mod ledger;
pub mod notify;
pub mod policy;
pub mod report;
pub mod rewards;
pub mod yellow_cards;
