pub mod peptide;
pub mod transfer;
