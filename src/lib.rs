pub mod atom;
pub mod bond;
pub mod element;
pub mod kekulize;
pub mod mol;
pub mod selfies;
pub mod smiles;

pub use atom::{Atom, Chirality};
pub use bond::{Bond, BondOrder, BondStereo};
pub use element::Element;
pub use kekulize::kekulize;
pub use mol::Mol;
pub use selfies::{
    decode, decode_fragment, split_symbols, symbol_count, DecodeError, Decoder, DecoderConfig,
    IndexAlphabet,
};
pub use smiles::to_smiles;
