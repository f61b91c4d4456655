//! Command implementations.

pub mod check;
pub mod describe;
pub mod predict;

pub use self::check::execute_check;
pub use self::describe::execute_describe;
pub use self::predict::execute_predict;
