pub mod table;
pub mod transfers;
