/*!
 * Concrete syntax tree
 *
 * Terminal nodes wrap one token, non-terminal nodes are tagged with the grammar rule that built them and own
 * their children in source order.
 */
use crate::preproc::{Token, TokenKind};

pub mod pretty_print;

#[derive(Debug,Clone,PartialEq)]
pub struct Node
{
	pub kind: TokenKind,
	pub lexeme: String,
	pub children: Vec<Node>,
}

impl Node
{
	/// Empty non-terminal
	pub fn new(kind: TokenKind) -> Node
	{
		Node::with_lexeme(kind, String::new())
	}
	pub fn with_lexeme<S: Into<String>>(kind: TokenKind, lexeme: S) -> Node
	{
		Node {
			kind: kind,
			lexeme: lexeme.into(),
			children: Vec::new(),
			}
	}
	pub fn leaf(tok: Token) -> Node
	{
		Node::with_lexeme(tok.kind, tok.lexeme)
	}

	pub fn push(&mut self, child: Node)
	{
		self.children.push(child);
	}

	pub fn is_terminal(&self) -> bool
	{
		!self.kind.is_nonterminal()
	}

	/// First direct child of the given kind
	pub fn child(&self, kind: TokenKind) -> Option<&Node>
	{
		self.children.iter().find(|c| c.kind == kind)
	}

	/// First node of the given kind in pre-order (including this one)
	pub fn find(&self, kind: TokenKind) -> Option<&Node>
	{
		if self.kind == kind {
			return Some(self);
		}
		self.children.iter().filter_map(|c| c.find(kind)).next()
	}
	pub fn contains(&self, kind: TokenKind) -> bool
	{
		self.find(kind).is_some()
	}

	/// Every terminal below this node, in source order
	pub fn terminals(&self) -> Vec<&Node>
	{
		let mut rv = Vec::new();
		self.collect_terminals(&mut rv);
		rv
	}
	fn collect_terminals<'a>(&'a self, out: &mut Vec<&'a Node>)
	{
		if self.is_terminal() {
			out.push(self);
		}
		for c in &self.children
		{
			c.collect_terminals(out);
		}
	}

	/// Terminal lexemes joined by single spaces
	pub fn text(&self) -> String
	{
		self.terminals().iter()
			.map(|n| &n.lexeme[..])
			.collect::<Vec<_>>()
			.join(" ")
	}
}
