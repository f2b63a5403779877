pub mod pool;
pub mod transfers;
