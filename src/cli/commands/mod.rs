mod command_result;
pub mod extract;
mod helper;
pub mod init;
pub mod pull;
pub mod reformat;

pub use command_result::*;
