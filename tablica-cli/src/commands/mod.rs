pub mod agenda;
pub mod events;
pub mod parse;
