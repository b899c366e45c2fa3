pub mod check;
mod command_result;
pub mod helper;
pub mod init;
pub mod process;

pub use command_result::*;
