//! Diagnostic sink shared by the token stream and the parser
//!
//! Lexical errors are kept one per line (the first report wins), grammar errors are all kept in the order
//! they were raised.
use std::collections::BTreeMap;
use std::fmt;

/// Lexical error classes
#[derive(Debug,PartialEq,Eq,Clone,Copy)]
pub enum LexError
{
	/// Unknown or truncated `\` escape
	Escape,
	/// Unterminated string literal
	String,
	/// Malformed character constant
	Char,
	/// Unterminated block comment
	Comment,
	/// Malformed `#include`
	Include,
	/// Malformed `#define`
	Define,
	/// Exponent without an explicit `+`
	FloatExponent,
	/// Operator spelling that isn't part of the language
	UnrecognizedToken,
	/// A character that cannot start any token
	UnrecognizedCharacter,
	/// Function-like macro used with the wrong number of arguments
	MacroArguments,
}

impl fmt::Display for LexError
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
	{
		f.write_str(match *self
			{
			LexError::Escape => "Incorrect Escape Character",
			LexError::String => "Incorrect String Syntax",
			LexError::Char => "Incorrect Char Syntax",
			LexError::Comment => "Comment Error: Missing close symbol",
			LexError::Include => "Include Syntax is wrong",
			LexError::Define => "Define Syntax is wrong",
			LexError::FloatExponent => "float type error",
			LexError::UnrecognizedToken => "unrecognized token",
			LexError::UnrecognizedCharacter => "unrecognized character",
			LexError::MacroArguments => "Macro argument count mismatch",
			})
	}
}

#[derive(Debug,PartialEq,Eq,Clone,Copy)]
pub enum DiagnosticKind
{
	Lexical(LexError),
	Grammar,
}

/// A single reported problem
#[derive(Debug,PartialEq,Eq,Clone)]
pub struct Diagnostic
{
	pub line: usize,
	pub kind: DiagnosticKind,
	pub message: String,
}

impl Diagnostic
{
	pub fn is_grammar(&self) -> bool
	{
		self.kind == DiagnosticKind::Grammar
	}
}

impl fmt::Display for Diagnostic
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
	{
		match self.kind
		{
		DiagnosticKind::Lexical(_) => write!(f, "Line No. {}\tErrors:\t{}", self.line, self.message),
		DiagnosticKind::Grammar => write!(f, "Line No. {}\tGrammar Error:\t{}", self.line, self.message),
		}
	}
}

#[derive(Debug,Default,Clone)]
pub struct Diagnostics
{
	lexical: BTreeMap<usize, LexError>,
	grammar: Vec<(usize, String)>,
}

impl Diagnostics
{
	pub fn new() -> Diagnostics
	{
		Default::default()
	}

	/// Record a lexical error, ignored if the line already has one
	pub fn lexical(&mut self, line: usize, err: LexError)
	{
		debug!("lexical error on line {}: {}", line, err);
		self.lexical.entry(line).or_insert(err);
	}

	pub fn grammar<S: Into<String>>(&mut self, line: usize, message: S)
	{
		let message = message.into();
		debug!("grammar error on line {}: {}", line, message);
		self.grammar.push( (line, message) );
	}

	pub fn lexical_count(&self) -> usize
	{
		self.lexical.len()
	}
	pub fn grammar_count(&self) -> usize
	{
		self.grammar.len()
	}
	pub fn is_empty(&self) -> bool
	{
		self.lexical.is_empty() && self.grammar.is_empty()
	}

	/// Drop grammar errors raised after a checkpoint was taken
	pub(crate) fn truncate_grammar(&mut self, count: usize)
	{
		self.grammar.truncate(count);
	}

	/// All entries: lexical ones by line, then grammar ones in report order
	pub fn entries(&self) -> Vec<Diagnostic>
	{
		let lex = self.lexical.iter()
			.map(|(&line, &err)| Diagnostic {
				line: line,
				kind: DiagnosticKind::Lexical(err),
				message: err.to_string(),
				});
		let gram = self.grammar.iter()
			.map(|&(line, ref msg)| Diagnostic {
				line: line,
				kind: DiagnosticKind::Grammar,
				message: msg.clone(),
				});
		lex.chain(gram).collect()
	}
}

impl fmt::Display for Diagnostics
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
	{
		for d in self.entries()
		{
			writeln!(f, "{}", d)?;
		}
		Ok( () )
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn first_lexical_error_per_line_wins()
	{
		let mut d = Diagnostics::new();
		d.lexical(3, LexError::String);
		d.lexical(3, LexError::Escape);
		d.lexical(1, LexError::Char);
		assert_eq!(d.lexical_count(), 2);
		let e = d.entries();
		assert_eq!(e[0].line, 1);
		assert_eq!(e[1].kind, DiagnosticKind::Lexical(LexError::String));
	}

	#[test]
	fn grammar_errors_are_all_kept()
	{
		let mut d = Diagnostics::new();
		d.grammar(2, "expected ';'");
		d.grammar(2, "expected ';'");
		d.lexical(5, LexError::Comment);
		assert_eq!(d.grammar_count(), 2);
		assert_eq!(d.to_string(),
			"Line No. 5\tErrors:\tComment Error: Missing close symbol\n\
			Line No. 2\tGrammar Error:\texpected ';'\n\
			Line No. 2\tGrammar Error:\texpected ';'\n");
		d.truncate_grammar(1);
		assert_eq!(d.grammar_count(), 1);
		assert!(!d.is_empty());
	}
}
