pub mod account;
pub mod balance;
pub mod bank;
pub mod category;
pub mod common;
pub mod transaction;
pub mod user;

pub use account::*;
pub use balance::*;
pub use bank::*;
pub use category::*;
pub use common::*;
pub use transaction::*;
pub use user::*;
