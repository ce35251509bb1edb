//! Standard transform definitions
//!
//! Pre-built chains for the common paths, one per lexing mode. All are statics built on first
//! use through `once_cell::sync::Lazy`.
//!
//! - [TOKENS]: a token listing; fails if the file does not scan
//! - [FRONT_END]: tokenization, structuring and the parse family
//! - [PLAIN], [EXTENDED], [DIALECT]: full compilations per mode; only the extended chain runs
//!   macro expansion, since plain C and the dialect language have no macros
//!
//! [pipeline_for] picks the chain for a mode.

use crate::lexing::LexMode;
use crate::token::Token;
use crate::transforms::stages::{
    MacroExpansion, ParseFamily, PostOperations, SourceUnit, Structuring, Tokenization, Tokenized,
};
use crate::transforms::{Compilation, Transform, TransformError};
use once_cell::sync::Lazy;

pub type TokenTransform = Transform<SourceUnit, Vec<Token>>;
pub type CompileTransform = Transform<SourceUnit, Compilation>;

pub static TOKENS: Lazy<TokenTransform> = Lazy::new(|| {
    Transform::from_fn(|unit: SourceUnit| Ok(unit))
        .then(Tokenization::new())
        .then(Transform::from_fn(|tokenized: Tokenized| {
            if tokenized.aborted {
                return Err(TransformError::StageFailed {
                    stage: "tokenization".to_string(),
                    message: tokenized.session.diagnostics.render(0).trim_end().to_string(),
                });
            }
            Ok(tokenized.tokens)
        }))
});

pub static FRONT_END: Lazy<CompileTransform> = Lazy::new(|| {
    Transform::from_fn(|unit: SourceUnit| Ok(unit))
        .then(Tokenization::new())
        .then(Structuring::new())
        .then(ParseFamily::new())
});

pub static PLAIN: Lazy<CompileTransform> = Lazy::new(|| {
    Transform::from_fn(|unit: SourceUnit| Ok(unit))
        .then_transform(&FRONT_END)
        .then(PostOperations::new())
});

pub static EXTENDED: Lazy<CompileTransform> = Lazy::new(|| {
    Transform::from_fn(|unit: SourceUnit| Ok(unit))
        .then_transform(&FRONT_END)
        .then(MacroExpansion::new())
        .then(PostOperations::new())
});

pub static DIALECT: Lazy<CompileTransform> = Lazy::new(|| {
    Transform::from_fn(|unit: SourceUnit| Ok(unit))
        .then_transform(&FRONT_END)
        .then(PostOperations::new())
});

pub fn pipeline_for(mode: LexMode) -> &'static CompileTransform {
    match mode {
        LexMode::Plain => &PLAIN,
        LexMode::Extended => &EXTENDED,
        LexMode::Dialect => &DIALECT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Tag;

    #[test]
    fn test_tokens() {
        let tokens = TOKENS.run(SourceUnit::new("a.cf", "int x;\n")).unwrap();
        assert_eq!(tokens[0].tag, Tag::Int);
    }

    #[test]
    fn test_tokens_fail_on_scan_error() {
        let err = TOKENS
            .run(SourceUnit::new("a.cf", "\"open\n"))
            .unwrap_err();
        assert!(matches!(err, TransformError::StageFailed { ref stage, .. } if stage == "tokenization"));
    }

    #[test]
    fn test_front_end_leaves_calls() {
        let out = FRONT_END
            .run(SourceUnit::new("a.cf", "macro M() { 1 }\nint x = @M();\n"))
            .unwrap();
        assert!(out.root.contains_any(&[Tag::MacroCall]));
    }

    #[test]
    fn test_extended_expands() {
        let out = pipeline_for(LexMode::Extended)
            .run(SourceUnit::new("a.cf", "macro M() { 1 }\nint x = @M();\n"))
            .unwrap();
        assert!(!out.aborted);
        assert!(!out.has_errors());
        assert!(out.root.contains_any(&[Tag::ExpressionExpansion]));
        assert_eq!(out.root.text_content(), "macro M() { 1 }\nint x =  1 ;\n");
    }

    #[test]
    fn test_plain_mode_has_no_macros() {
        let out = pipeline_for(LexMode::Plain)
            .run(SourceUnit::new("a.c", "int object = 1;\n"))
            .unwrap();
        assert!(!out.has_errors(), "{}", out.render_diagnostics());
        assert_eq!(out.root.tag_at(0), Some(Tag::Declaration));
    }
}
