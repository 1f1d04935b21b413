//! SMILES output for decoded graphs.

mod writer;

pub use writer::to_smiles;
