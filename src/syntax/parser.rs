//! Recursive descent reader for Tern declaration files.
//!
//! Builds the per-file declaration skeleton: the namespace and type shape,
//! `#ref` directives, and diagnostics. Type bodies are skimmed rather than
//! parsed; only directly nested type declarations are kept. The reader
//! never fails, it records diagnostics and recovers.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::base::limits::MAX_DECL_DEPTH;
use crate::base::{FileId, SmolStr, TextRange, TextSize};
use crate::decl::{
    ReferenceDirective, RootDeclaration, SingleMember, SingleNamespace, SingleType, TypeKind,
};
use crate::diagnostics::{Diagnostic, codes};

use super::lexer::{Token, TokenKind, tokenize};

/// Result of reading one file.
///
/// Parsing never fails. Declaration-level problems land in
/// [`ParsedFile::diagnostics`]; directive problems travel on the root
/// declaration itself so they stay visible after merging.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub root: Arc<RootDeclaration>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedFile {
    /// Whether parsing recorded no diagnostics of any kind.
    pub fn ok(&self) -> bool {
        self.diagnostics.is_empty() && self.root.directive_diagnostics.is_empty()
    }
}

/// Parse one declaration file.
pub fn parse_file(file: FileId, text: &str) -> ParsedFile {
    let tokens: Vec<Token<'_>> = tokenize(text)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .collect();
    Parser::new(file, tokens, TextSize::of(text)).parse_root()
}

/// Parse a batch of files in parallel, preserving input order.
pub fn parse_many(files: &[(FileId, &str)]) -> Vec<ParsedFile> {
    debug!(files = files.len(), "parsing declaration files");
    files
        .par_iter()
        .map(|&(file, text)| parse_file(file, text))
        .collect()
}

/// The parser state
struct Parser<'a> {
    file: FileId,
    tokens: Vec<Token<'a>>,
    pos: usize,
    end: TextSize,
    diagnostics: Vec<Diagnostic>,
    directives: Vec<ReferenceDirective>,
    directive_diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(file: FileId, tokens: Vec<Token<'a>>, end: TextSize) -> Self {
        Self {
            file,
            tokens,
            pos: 0,
            end,
            diagnostics: Vec::new(),
            directives: Vec::new(),
            directive_diagnostics: Vec::new(),
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_text(&self) -> &'a str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    fn current_range(&self) -> TextRange {
        self.current()
            .map(|t| t.range)
            .unwrap_or_else(|| TextRange::empty(self.end))
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().map(|t| t.kind) == Some(kind)
    }

    fn at_type_keyword(&self) -> bool {
        self.current().is_some_and(|t| t.kind.is_type_keyword())
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> TextSize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.range.end(),
            None => TextSize::new(0),
        }
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn report(&mut self, code: &'static str, message: impl Into<Arc<str>>) {
        let range = self.current_range();
        self.report_span(code, range, message);
    }

    fn report_span(&mut self, code: &'static str, range: TextRange, message: impl Into<Arc<str>>) {
        self.diagnostics
            .push(Diagnostic::error(self.file, range, message).with_code(code));
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// File = Directive* Member*
    fn parse_root(mut self) -> ParsedFile {
        self.parse_directives();
        let members = self.parse_members(0, true);

        let range = TextRange::new(TextSize::new(0), self.end);
        let namespace = Arc::new(SingleNamespace::new("", range, members));
        let root = RootDeclaration::new(self.file, namespace)
            .with_directives(self.directives, self.directive_diagnostics);

        ParsedFile {
            root: Arc::new(root),
            diagnostics: self.diagnostics,
        }
    }

    /// Directive = `#ref` String `;`?
    ///
    /// Directives are only legal before the first declaration.
    fn parse_directives(&mut self) {
        while self.at(TokenKind::RefDirective) {
            let start = self.current_range();
            self.bump();

            if !self.at(TokenKind::String) {
                self.directive_diagnostics.push(
                    Diagnostic::error(self.file, start, "expected a quoted path after `#ref`")
                        .with_code(codes::EXPECTED_REFERENCE_PATH),
                );
                // The offending token may start a declaration; leave it.
                continue;
            }

            let range = TextRange::new(start.start(), self.current_range().end());
            let raw = self.current_text();
            let path = &raw[1..raw.len() - 1];
            if path.is_empty() {
                self.directive_diagnostics.push(
                    Diagnostic::error(self.file, range, "reference directive has an empty path")
                        .with_code(codes::EMPTY_REFERENCE_PATH),
                );
            } else {
                self.directives
                    .push(ReferenceDirective::new(self.file, path, range));
            }
            self.bump();
            self.eat(TokenKind::Semicolon);
        }
    }

    /// A `#ref` seen once declarations have started. The directive is
    /// swallowed and dropped.
    fn report_late_directive(&mut self) {
        let start = self.current_range();
        self.bump();
        let range = if self.at(TokenKind::String) {
            let range = TextRange::new(start.start(), self.current_range().end());
            self.bump();
            self.eat(TokenKind::Semicolon);
            range
        } else {
            start
        };
        self.directive_diagnostics.push(
            Diagnostic::error(
                self.file,
                range,
                "reference directives must appear before any declaration",
            )
            .with_code(codes::DIRECTIVE_AFTER_DECLARATION),
        );
    }

    /// Member* = (Namespace | Type)*
    ///
    /// Stops at the closing `}` of the enclosing body, or at end of input
    /// when reading the file level.
    fn parse_members(&mut self, depth: usize, top_level: bool) -> Vec<SingleMember> {
        let mut members = Vec::new();
        loop {
            if self.at_eof() {
                break;
            }
            if self.at(TokenKind::RBrace) && !top_level {
                break;
            }

            let before = self.pos;
            if self.at(TokenKind::NamespaceKw) {
                if let Some(namespace) = self.parse_namespace(depth) {
                    members.push(SingleMember::Namespace(namespace));
                }
            } else if self.at_type_keyword() {
                if let Some(ty) = self.parse_type(depth) {
                    members.push(SingleMember::Type(ty));
                }
            } else if self.at(TokenKind::RefDirective) {
                self.report_late_directive();
            } else {
                self.report(
                    codes::UNEXPECTED_TOKEN,
                    format!("unexpected `{}`", self.current_text()),
                );
                self.bump();
            }
            // Safety: if a rule consumed nothing, force-skip a token.
            if self.pos == before && !self.at_eof() {
                self.bump();
            }
        }
        members
    }

    /// Namespace = `namespace` Name (`.` Name)* `{` Member* `}`
    ///
    /// A dotted name expands into one namespace per segment; the innermost
    /// segment holds the body's members and every wrapper shares the whole
    /// declaration's range.
    fn parse_namespace(&mut self, depth: usize) -> Option<Arc<SingleNamespace>> {
        let start = self.current_range().start();
        self.bump(); // `namespace`

        let first = match self.expect_name() {
            Some(name) => name,
            None => {
                self.skim_body_if_present();
                return None;
            }
        };
        let mut segments = vec![first];
        while self.eat(TokenKind::Dot) {
            match self.expect_name() {
                Some(name) => segments.push(name),
                None => break,
            }
        }

        let depth = depth + segments.len();
        if depth > MAX_DECL_DEPTH {
            let range = TextRange::new(start, self.prev_end());
            self.report_span(codes::DECL_TOO_DEEP, range, "namespace is nested too deeply");
            self.skim_body_if_present();
            return None;
        }

        let members;
        if self.at(TokenKind::LBrace) {
            let open = self.current_range();
            self.bump();
            members = self.parse_members(depth, false);
            if !self.eat(TokenKind::RBrace) {
                self.report_span(codes::UNCLOSED_BRACE, open, "unclosed `{`");
            }
        } else {
            self.report(codes::EXPECTED_BODY, "expected `{` after the namespace name");
            members = Vec::new();
        }

        let range = TextRange::new(start, self.prev_end());
        let mut names = segments.into_iter().rev();
        let mut namespace = Arc::new(SingleNamespace::new(names.next()?, range, members));
        for name in names {
            namespace = Arc::new(SingleNamespace::new(
                name,
                range,
                vec![SingleMember::Namespace(namespace)],
            ));
        }
        Some(namespace)
    }

    /// Type = (`class` | `struct` | `interface` | `enum`) Name Generics?
    ///        (`{` Body `}` | `;`)
    fn parse_type(&mut self, depth: usize) -> Option<Arc<SingleType>> {
        let start = self.current_range().start();
        let kind = self.current_type_kind()?;
        self.bump();

        let name = match self.expect_name() {
            Some(name) => name,
            None => {
                self.skim_type_tail();
                return None;
            }
        };

        let arity = self.parse_generic_arity();

        if depth + 1 > MAX_DECL_DEPTH {
            let range = TextRange::new(start, self.prev_end());
            self.report_span(
                codes::DECL_TOO_DEEP,
                range,
                format!("`{name}` is nested too deeply"),
            );
            self.skim_type_tail();
            return None;
        }

        let mut nested = Vec::new();
        if self.at(TokenKind::LBrace) {
            let open = self.current_range();
            self.bump();
            nested = self.skim_type_body(depth + 1, open);
        } else if !self.eat(TokenKind::Semicolon) {
            self.report(
                codes::EXPECTED_BODY,
                format!("expected `{{` or `;` after `{name}`"),
            );
        }

        let range = TextRange::new(start, self.prev_end());
        let ty = SingleType::new(name, kind, arity, range).with_nested(nested);
        Some(Arc::new(ty))
    }

    /// Generics = `<` (Name (`,` Name)*)? `>`
    ///
    /// Only the parameter count matters; bounds and defaults do not exist
    /// in the declaration skeleton.
    fn parse_generic_arity(&mut self) -> usize {
        if !self.eat(TokenKind::Lt) {
            return 0;
        }
        if self.eat(TokenKind::Gt) {
            return 0;
        }

        let mut arity = 0;
        loop {
            if self.at(TokenKind::Ident) {
                self.bump();
                arity += 1;
            } else {
                self.report(codes::EXPECTED_NAME, "expected a type parameter name");
                break;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        if !self.eat(TokenKind::Gt) {
            self.report(
                codes::UNEXPECTED_TOKEN,
                "expected `>` to close the type parameter list",
            );
        }
        arity
    }

    /// Body of a type: skimmed token by token. Directly nested type
    /// declarations are collected; any other braced region is skipped
    /// whole, so a type inside a member body is not a member.
    fn skim_type_body(&mut self, depth: usize, open: TextRange) -> Vec<Arc<SingleType>> {
        let mut nested = Vec::new();
        loop {
            if self.at_eof() {
                self.report_span(codes::UNCLOSED_BRACE, open, "unclosed `{`");
                return nested;
            }
            if self.at(TokenKind::RBrace) {
                self.bump();
                return nested;
            }
            if self.at_type_keyword() {
                if let Some(ty) = self.parse_type(depth) {
                    nested.push(ty);
                }
                continue;
            }
            if self.at(TokenKind::LBrace) {
                self.skim_balanced();
                continue;
            }
            self.bump();
        }
    }

    /// Skip a balanced `{ ... }` region without collecting anything.
    fn skim_balanced(&mut self) {
        let open = self.current_range();
        self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            if self.at_eof() {
                self.report_span(codes::UNCLOSED_BRACE, open, "unclosed `{`");
                return;
            }
            if self.at(TokenKind::LBrace) {
                depth += 1;
            } else if self.at(TokenKind::RBrace) {
                depth -= 1;
            }
            self.bump();
        }
    }

    fn skim_body_if_present(&mut self) {
        if self.at(TokenKind::LBrace) {
            self.skim_balanced();
        }
    }

    fn skim_type_tail(&mut self) {
        if self.at(TokenKind::LBrace) {
            self.skim_balanced();
        } else {
            self.eat(TokenKind::Semicolon);
        }
    }

    fn expect_name(&mut self) -> Option<SmolStr> {
        if self.at(TokenKind::Ident) {
            let name = SmolStr::new(self.current_text());
            self.bump();
            Some(name)
        } else {
            self.report(codes::EXPECTED_NAME, "expected a name");
            None
        }
    }

    fn current_type_kind(&self) -> Option<TypeKind> {
        match self.current()?.kind {
            TokenKind::ClassKw => Some(TypeKind::Class),
            TokenKind::StructKw => Some(TypeKind::Struct),
            TokenKind::InterfaceKw => Some(TypeKind::Interface),
            TokenKind::EnumKw => Some(TypeKind::Enum),
            _ => None,
        }
    }
}
