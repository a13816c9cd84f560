//! Static rules corpus for the tasha character builder.
//!
//! Classes, subclasses, multiclassing floors, backgrounds, species, feats,
//! spell lists and slot progressions ship as TOML documents embedded in the
//! binary. [`Srd::load`] parses them once into an immutable repository;
//! every lookup of an unknown key fails with [`SrdError::NotFound`].

pub mod ability;
pub mod category;
pub mod entry;
pub mod error;
pub mod grant;
pub mod repository;

pub use ability::Ability;
pub use category::{Category, RuleEntry};
pub use entry::{
    BackgroundEntry, ClassEntry, FeatCategory, FeatEntry, FloorMode, Lists, MulticlassEntry,
    Preparation, SpeciesEntry, SpellList, Spellcasting, SubclassEntry,
};
pub use error::{SrdError, SrdResult};
pub use grant::Grant;
pub use repository::Srd;
