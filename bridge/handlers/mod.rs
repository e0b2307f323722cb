pub mod classify;
pub mod meta;
