//! Period bookkeeping and money arithmetic

pub mod money;
pub mod time;
