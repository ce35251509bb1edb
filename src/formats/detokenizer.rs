//! Detokenizer
//!
//!     Terminals carry their exact source text, so printing a tree or a token list is plain
//!     concatenation. Before expansion this reproduces the input byte for byte; after
//!     expansion it prints the expanded program.

use crate::lexing::detokenize_tokens;
use crate::token::Token;
use crate::tree::Node;

pub trait ToSource {
    fn to_source(&self) -> String;
}

impl ToSource for Node {
    fn to_source(&self) -> String {
        self.text_content()
    }
}

impl ToSource for [Token] {
    fn to_source(&self) -> String {
        detokenize_tokens(self)
    }
}

pub fn detokenize<T: ToSource + ?Sized>(value: &T) -> String {
    value.to_source()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::{lex, LexMode};

    #[test]
    fn test_tokens_and_tree_agree() {
        let source = "int main(void) { return 0; } // done\n";
        let tokens = lex("t.cf", source, LexMode::Extended).unwrap();
        assert_eq!(detokenize(tokens.as_slice()), source);

        let (_, root) = crate::parsing::testing::parse_source(source);
        assert_eq!(detokenize(&root), source);
    }
}
