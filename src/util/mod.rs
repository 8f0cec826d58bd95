pub mod completion;
pub mod error;
pub mod ids;
pub mod jwt;
pub mod logger;
pub mod notify;
pub mod password;
pub mod storage;
