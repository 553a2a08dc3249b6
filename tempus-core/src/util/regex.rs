use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref DISCORD_TIMESTAMP: Regex = Regex::new(r"^<t:(-?\d{1,13})(?::[tTdDfFR])?>$").unwrap();
}
