/*!
 * Recursive-descent parser
 *
 * One method per grammar rule, each returning the node for that rule. Missing tokens are reported to the
 * diagnostics and parsing carries on from the current token.
 */
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::ast::Node;
use crate::diagnostics::Diagnostics;
use crate::preproc::{MacroDefinition, Preproc, Token, TokenKind};

/// Checks if the next token is any of the listed kinds
macro_rules! peek_token {
	($_self:ident, $($kind:ident)|+) => {
		match $_self.lex.peek_token().kind
		{
		$( TokenKind::$kind )|+ => true,
		_ => false,
		}
	};
}

mod parsing;
mod types;
mod expr;

/// A parsed translation unit along with everything gathered while parsing it
pub struct Parser
{
	root: Node,
	diag: Diagnostics,
	macros: HashMap<String,MacroDefinition>,
	typedef_names: HashSet<String>,
}

impl Parser
{
	/// Read and parse a `.c` file
	pub fn from_path(path: &Path) -> crate::Result<Parser>
	{
		let lex = Preproc::open(path)?;
		Ok(Parser::parse(lex, &path.display().to_string()))
	}

	/// Parse source text, `name` labels the root node
	pub fn from_source(name: &str, src: &str) -> Parser
	{
		Parser::parse(Preproc::new(src), name)
	}

	fn parse(lex: Preproc, name: &str) -> Parser
	{
		let mut state = ParseState {
			lex: lex,
			typedef_names: HashSet::new(),
			};
		let root = state.translation_unit(name);
		debug!("Parsed {}: {} top-level items, {} typedef names", name, root.children.len(), state.typedef_names.len());
		let ParseState { lex, typedef_names } = state;
		let (macros, diag) = lex.into_parts();
		Parser {
			root: root,
			diag: diag,
			macros: macros,
			typedef_names: typedef_names,
			}
	}

	/// The TRANSLATION_UNIT node
	pub fn root(&self) -> &Node
	{
		&self.root
	}
	pub fn into_root(self) -> Node
	{
		self.root
	}
	pub fn diagnostics(&self) -> &Diagnostics
	{
		&self.diag
	}
	pub fn macros(&self) -> &HashMap<String,MacroDefinition>
	{
		&self.macros
	}
	pub fn is_typedef_name(&self, name: &str) -> bool
	{
		self.typedef_names.contains(name)
	}
	pub fn typedef_names(&self) -> &HashSet<String>
	{
		&self.typedef_names
	}
}

struct ParseState
{
	lex: Preproc,
	/// Names declared by `typedef` so far
	typedef_names: HashSet<String>,
}

/// How a token is named in error messages
fn describe(tok: &Token) -> String
{
	if tok.is_end() {
		"end of input".to_owned()
	}
	else {
		format!("'{}'", tok.lexeme)
	}
}

impl ParseState
{
	fn peek_kind(&mut self) -> TokenKind
	{
		self.lex.peek_token().kind
	}
	fn peek_kind_nth(&mut self, n: usize) -> TokenKind
	{
		self.lex.peek_nth(n).kind
	}

	/// Peek-only test
	fn matches(&mut self, kind: TokenKind) -> bool
	{
		self.peek_kind() == kind
	}

	/// Consume the next token into `parent`
	fn take_into(&mut self, parent: &mut Node)
	{
		let tok = self.lex.get_token();
		parent.push(Node::leaf(tok));
	}

	/// Consume into `parent` if the next token is `kind`
	fn eat_into(&mut self, parent: &mut Node, kind: TokenKind) -> bool
	{
		if self.matches(kind) {
			self.take_into(parent);
			true
		}
		else {
			false
		}
	}

	/// Consume a required token, reporting (and not consuming anything) when it's absent
	fn expect_into(&mut self, parent: &mut Node, kind: TokenKind, what: &str) -> bool
	{
		if self.eat_into(parent, kind) {
			true
		}
		else {
			let tok = self.lex.peek_token();
			self.error_at(tok.line, format!("expected {} before {}", what, describe(&tok)));
			false
		}
	}

	/// Report a grammar error at the next token
	fn error<S: Into<String>>(&mut self, message: S)
	{
		let line = self.lex.peek_token().line;
		self.error_at(line, message);
	}
	fn error_at<S: Into<String>>(&mut self, line: usize, message: S)
	{
		self.lex.diagnostics_mut().grammar(line, message);
	}
	fn grammar_error_count(&self) -> usize
	{
		self.lex.diagnostics().grammar_count()
	}

	/// Run `f` and rewind to the current position afterwards
	fn lookahead<T, F>(&mut self, f: F) -> T
	where
		F: FnOnce(&mut Self) -> T
	{
		let cp = self.lex.checkpoint();
		let rv = f(self);
		self.lex.restore(cp);
		rv
	}

	/// Trial parse: keep the result on `Some`, rewind (dropping any errors) on `None`
	fn speculate<F>(&mut self, f: F) -> Option<Node>
	where
		F: FnOnce(&mut Self) -> Option<Node>
	{
		let cp = self.lex.checkpoint();
		match f(self)
		{
		Some(n) => Some(n),
		None => {
			self.lex.restore(cp);
			None
			},
		}
	}

	/// Parse one item of a list. If the item consumed nothing its errors are dropped, the offending token is
	/// reported and skipped, and `None` is returned.
	fn list_item<F>(&mut self, f: F) -> Option<Node>
	where
		F: FnOnce(&mut Self) -> Node
	{
		let cp = self.lex.checkpoint();
		let start = self.lex.position();
		let node = f(self);
		if self.lex.position() != start {
			return Some(node);
		}
		self.lex.restore(cp);
		let tok = self.lex.get_token();
		self.error_at(tok.line, format!("unexpected {}", describe(&tok)));
		None
	}

	fn is_typedef_name(&self, name: &str) -> bool
	{
		self.typedef_names.contains(name)
	}

	fn register_typedef(&mut self, declarator: &Node)
	{
		match types::declarator_name(declarator)
		{
		Some(name) => {
			debug!("typedef name `{}`", name);
			self.typedef_names.insert(name.to_owned());
			},
		None => trace!("typedef without a name"),
		}
	}

	/// Can this token begin a type name (specifier or qualifier)
	fn starts_type_name(&self, tok: &Token) -> bool
	{
		tok.kind.is_type_specifier() || tok.kind.is_type_qualifier() || tok.kind == TokenKind::Alignas
			|| (tok.kind == TokenKind::Id && self.is_typedef_name(&tok.lexeme))
	}

	/// Can this token begin a declaration
	fn starts_declaration(&self, tok: &Token) -> bool
	{
		self.starts_type_name(tok) || tok.kind.is_storage_class() || tok.kind.is_function_specifier()
			|| tok.kind == TokenKind::StaticAssert
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn macro_table_and_typedefs_survive()
	{
		let p = Parser::from_source("t.c", "#define N 4\ntypedef int T[N];\nT x;");
		assert!(p.macros().contains_key("N"));
		assert!(p.is_typedef_name("T"));
		assert!(!p.is_typedef_name("x"));
		assert_eq!(p.typedef_names().len(), 1);
		assert!(p.diagnostics().is_empty(), "{}", p.diagnostics());
		assert_eq!(p.root().lexeme, "t.c");
	}

	#[test]
	fn speculation_rolls_back_errors()
	{
		let mut s = ParseState {
			lex: Preproc::new("a b"),
			typedef_names: HashSet::new(),
			};
		let r = s.speculate(|s| {
			s.lex.get_token();
			s.error("nope");
			None
			});
		assert!(r.is_none());
		assert_eq!(s.grammar_error_count(), 0);
		assert_eq!(s.lex.peek_token().lexeme, "a");
	}

	#[test]
	fn stray_list_item_is_skipped()
	{
		let mut s = ParseState {
			lex: Preproc::new(") x"),
			typedef_names: HashSet::new(),
			};
		let r = s.list_item(|s| {
			s.error("first");
			s.error("second");
			Node::new(TokenKind::ExpressionStatement)
			});
		assert!(r.is_none());
		let d = s.lex.diagnostics().entries();
		assert_eq!(d.len(), 1);
		assert_eq!(d[0].message, "unexpected ')'");
		assert_eq!(s.lex.peek_token().lexeme, "x");
	}
}
