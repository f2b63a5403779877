pub mod io;
pub mod labware;
pub mod models;
