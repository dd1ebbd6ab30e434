pub mod cdn;
pub mod storage;
