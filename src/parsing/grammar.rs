//! The grammar table
//!
//!     Maps each composite tag to the context that parses it. Tags with no entry (Parens before
//!     any pass has claimed them, VisibilityLabel, Call, BaseList, Entry, ...) are only recursed
//!     into.

use super::contexts::declarations::DECLARATION;
use super::contexts::dialect::{DIALECT_BODY, DIALECT_ITEMS, DIALECT_SECTION};
use super::contexts::enums::{ENUM, ENUM_BODY};
use super::contexts::expressions::EXPRESSION;
use super::contexts::functions::{FUNCTION, PARAM, PARAM_LIST};
use super::contexts::items::ITEMS;
use super::contexts::macros::{ARGUMENTS, CALL, MACRO_BODY, MACRO_DEF, MACRO_PARAMS};
use super::contexts::objects::{MEMBER_EXPANSION, OBJECT, OBJECT_BODY};
use super::contexts::preprocessor::PREPROCESSOR;
use super::contexts::records::{RECORD, RECORD_BODY};
use super::contexts::states::{STATE_BODY, STATE_DEF, STATE_MACHINE};
use super::contexts::statements::{BLOCK, DO_WHILE, FOR, FOR_HEADER, IF, LOOP};
use super::contexts::types::TYPE_SPEC;
use super::passes::Context;
use crate::token::Tag;

pub fn context_for(tag: Tag) -> Option<&'static Context> {
    let context = match tag {
        Tag::File | Tag::ItemExpansion => &ITEMS,
        Tag::DialectFile => &DIALECT_ITEMS,
        Tag::Preprocessor => &PREPROCESSOR,

        Tag::MacroDef => &MACRO_DEF,
        Tag::MacroParams => &MACRO_PARAMS,
        Tag::MacroBody => &MACRO_BODY,
        Tag::MacroCall | Tag::ExpandCall => &CALL,
        Tag::Arguments => &ARGUMENTS,

        Tag::Function => &FUNCTION,
        Tag::ParamList => &PARAM_LIST,
        Tag::Param => &PARAM,
        Tag::TypeSpec => &TYPE_SPEC,
        Tag::Declaration => &DECLARATION,

        Tag::Body | Tag::Block | Tag::StatementExpansion => &BLOCK,
        Tag::IfStatement => &IF,
        Tag::WhileStatement | Tag::SwitchStatement => &LOOP,
        Tag::ForStatement => &FOR,
        Tag::DoWhileStatement => &DO_WHILE,
        Tag::ForHeader => &FOR_HEADER,

        Tag::Statement
        | Tag::Jump
        | Tag::Label
        | Tag::CaseLabel
        | Tag::Condition
        | Tag::ForClause
        | Tag::Argument
        | Tag::Initializer
        | Tag::Group
        | Tag::Index
        | Tag::InitList
        | Tag::Enumerator
        | Tag::ExpressionExpansion => &EXPRESSION,

        Tag::ObjectDef | Tag::UserConstruct => &OBJECT,
        Tag::ObjectBody => &OBJECT_BODY,
        Tag::MemberExpansion => &MEMBER_EXPANSION,

        Tag::EnumDef => &ENUM,
        Tag::EnumBody => &ENUM_BODY,
        Tag::Record => &RECORD,
        Tag::RecordBody => &RECORD_BODY,

        Tag::StateMachine => &STATE_MACHINE,
        Tag::StateBody => &STATE_BODY,
        Tag::StateDef => &STATE_DEF,

        Tag::NoteDef | Tag::MapDef => &DIALECT_SECTION,
        Tag::DialectBody => &DIALECT_BODY,

        _ => return None,
    };
    Some(context)
}
