pub mod bump;
pub mod compose;
pub mod config;
pub mod init;
pub mod ledger;
pub mod rules;
