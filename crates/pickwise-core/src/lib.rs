// Library root: the draft and deck analytics engine.
//
// Every operation here is a pure function over already-fetched rating,
// card metadata and collection data. Nothing in this crate performs I/O.

pub mod card;
pub mod collection;
pub mod deck;
pub mod draft;
pub mod error;
pub mod letter;
pub mod lookup;
pub mod tier;

pub use card::{ArenaId, CardMetadata, CardRating, CardType, Color, ColorSet, Rarity};
pub use error::ParseError;
pub use letter::LetterGrade;
pub use lookup::{
    CardCatalog, CardMetadataLookup, CollectionQuantities, RatingLookup, RatingScope, RatingTable,
};
pub use tier::Tier;
