//! Grammar contexts
//!
//!     One module per family of constructs. Each exports `Context` statics that the grammar
//!     table (see [grammar](super::grammar)) maps tags to, and the passes they are built from.
//!     Passes shared between families live with the family that owns the construct they
//!     build: `items::fold_terminated` is reused by object, record and dialect bodies,
//!     `macros::expand_calls` by items and object bodies, `types::pointers` by every type
//!     position.

pub mod declarations;
pub mod dialect;
pub mod enums;
pub mod expressions;
pub mod functions;
pub mod items;
pub mod macros;
pub mod objects;
pub mod preprocessor;
pub mod records;
pub mod states;
pub mod statements;
pub mod types;

use crate::token::Tag;

/// Type words, modifiers and the aggregate keywords: what may open a type.
pub fn is_type_start(tag: Tag) -> bool {
    tag.is_type_word()
        || tag.is_modifier()
        || matches!(
            tag,
            Tag::Struct | Tag::Union | Tag::Enum | Tag::Record | Tag::EnumDef | Tag::ConstructName
        )
}

/// What may appear in a type: type words, qualifiers, names and the composites that stand for
/// types.
pub fn is_type_part(tag: Tag) -> bool {
    is_type_start(tag)
        || matches!(
            tag,
            Tag::Identifier | Tag::ScopeRef | Tag::TemplateRef | Tag::PointerType
        )
}
