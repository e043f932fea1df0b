//! Syntax layer: lexing and declaration-skeleton parsing.
//!
//! The lexer produces a lossless token stream; the parser reads it into
//! per-file [`RootDeclaration`](crate::decl::RootDeclaration) trees,
//! skimming everything below the declaration level.

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::{ParsedFile, parse_file, parse_many};
