//! Standard math utilities missing in `stylus_sdk::storage`.
pub mod storage;
