//! Mesh construction and modification

pub mod fragment;
pub mod modifiers;
pub mod primitives;

pub use fragment::{Face, MeshFragment, combine};
pub use modifiers::{MeshApply, MeshModifier, Translate, Weld};
pub use primitives::{OrientedBox, Section, append_box, build_box, loft, strip};
