pub mod commit;
pub mod compose;
pub mod config;
pub mod error;
pub mod io;
pub mod ledger;
pub mod paths;
pub mod rule;
pub mod types;
pub mod version;

pub use error::{Result, RulesmithError};
