pub mod command;
pub mod tempus;
pub mod util;
