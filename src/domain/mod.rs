mod ledger;
mod money;
mod period;
mod transaction;

pub use ledger::*;
pub use money::*;
pub use period::*;
pub use transaction::*;
