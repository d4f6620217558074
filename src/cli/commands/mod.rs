pub mod attendance;
pub mod backup;
pub mod config;
pub mod credits;
pub mod day;
pub mod init;
pub mod report;
pub mod user;
pub mod yellow;
