pub mod delivery;
pub mod steam;
pub mod storage;
