pub mod reference_cache;
pub mod time_parse;
