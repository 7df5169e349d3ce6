mod account;
mod audit;
mod customer;
mod inventory;
mod ledger;
mod money;
mod payroll;
mod period;
mod record;
mod review;

pub use account::*;
pub use audit::*;
pub use customer::*;
pub use inventory::*;
pub use ledger::*;
pub use money::*;
pub use payroll::*;
pub use period::*;
pub use record::*;
pub use review::*;
