//! C Pre-processor handling
//!
//! `Preproc` is the token stream seen by the parser: it runs the raw scanner, handles `#include`/`#define`/
//! `#undef`, expands macros, and keeps every produced token in a buffer so the parser can peek ahead, step
//! back and rewind to a checkpoint.
use std::collections::HashMap;
use std::path::Path;

pub use self::token::{Token, TokenKind};
pub mod token;
mod lex;

use crate::diagnostics::{Diagnostics, LexError};

/// A `#define`d macro
#[derive(Debug,Clone,PartialEq)]
pub struct MacroDefinition
{
	/// Parameter names, `None` for an object-like macro
	pub arg_names: Option<Vec<String>>,
	/// Body tokens, as captured at the definition
	pub expansion: Vec<Token>,
}

/// Saved stream position (see `Preproc::checkpoint`)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct Checkpoint
{
	cursor: usize,
	grammar_errors: usize,
}

pub struct Preproc
{
	lexer: lex::Lexer,
	/// Raw token read while looking for a macro's `(`
	saved_tok: Option<Token>,
	/// Every token produced so far
	tokens: Vec<Token>,
	/// Index of the next token to hand out
	cursor: usize,
	/// Set once `End` is in the buffer
	ended: bool,
	/// Parsed macros
	macros: HashMap<String,MacroDefinition>,
	diag: Diagnostics,
}

impl Preproc
{
	pub fn new(src: &str) -> Preproc
	{
		Preproc {
			lexer: lex::Lexer::new(src),
			saved_tok: None,
			tokens: Vec::new(),
			cursor: 0,
			ended: false,
			macros: HashMap::new(),
			diag: Diagnostics::new(),
			}
	}

	/// Open a `.c` file
	pub fn open(path: &Path) -> crate::Result<Preproc>
	{
		crate::check_extension(path)?;
		let src = ::std::fs::read_to_string(path)?;
		debug!("Opened {}", path.display());
		Ok(Preproc::new(&src))
	}

	pub fn macros(&self) -> &HashMap<String,MacroDefinition>
	{
		&self.macros
	}
	pub fn diagnostics(&self) -> &Diagnostics
	{
		&self.diag
	}
	pub fn diagnostics_mut(&mut self) -> &mut Diagnostics
	{
		&mut self.diag
	}
	/// Hand over the macro table and diagnostics once the stream is no longer needed
	pub fn into_parts(self) -> (HashMap<String,MacroDefinition>, Diagnostics)
	{
		(self.macros, self.diag)
	}

	/// Number of tokens consumed so far
	pub fn position(&self) -> usize
	{
		self.cursor
	}

	/// Consume the next token. `End` is returned for every call once the input is exhausted.
	pub fn get_token(&mut self) -> Token
	{
		let n = self.cursor + 1;
		self.fill(n);
		let tok = match self.tokens.get(self.cursor)
			{
			Some(t) => {
				self.cursor += 1;
				t.clone()
				},
			None => self.end_token(),
			};
		trace!("get_token = {}", tok);
		tok
	}

	pub fn peek_token(&mut self) -> Token
	{
		self.peek_nth(0)
	}

	/// Look `n` tokens past the next one without consuming anything
	pub fn peek_nth(&mut self, n: usize) -> Token
	{
		let want = self.cursor + n + 1;
		self.fill(want);
		match self.tokens.get(self.cursor + n)
		{
		Some(t) => t.clone(),
		None => self.end_token(),
		}
	}

	/// Step back one token (no-op at the start of input), returning the token now under the cursor
	pub fn unget(&mut self) -> Token
	{
		if self.cursor > 0 {
			self.cursor -= 1;
		}
		self.peek_token()
	}

	/// Snapshot the stream position and the grammar error count
	pub fn checkpoint(&self) -> Checkpoint
	{
		Checkpoint {
			cursor: self.cursor,
			grammar_errors: self.diag.grammar_count(),
			}
	}
	/// Return to a checkpoint, forgetting grammar errors raised since. Lexical errors are kept.
	pub fn restore(&mut self, cp: Checkpoint)
	{
		trace!("restore to {} (from {})", cp.cursor, self.cursor);
		self.cursor = cp.cursor;
		self.diag.truncate_grammar(cp.grammar_errors);
	}

	fn end_token(&self) -> Token
	{
		match self.tokens.last()
		{
		Some(t) if t.is_end() => t.clone(),
		_ => Token::new(TokenKind::End, "", self.lexer.line()),
		}
	}

	/// Grow the buffer to `len` tokens (or until the input ends)
	fn fill(&mut self, len: usize)
	{
		while self.tokens.len() < len && !self.ended
		{
			self.pull();
		}
	}

	/// Process one raw token, appending zero or more tokens to the buffer
	fn pull(&mut self)
	{
		let tok = match self.saved_tok.take()
			{
			Some(t) => t,
			None => self.lexer.get_token(&mut self.diag),
			};
		match tok.kind
		{
		TokenKind::End => {
			self.ended = true;
			self.tokens.push(tok);
			},
		TokenKind::Hash => self.directive(tok.line),
		TokenKind::Id if self.macros.contains_key(&tok.lexeme) => self.expand(tok),
		_ => self.tokens.push(tok),
		}
	}

	fn directive(&mut self, line: usize)
	{
		let name = match self.lexer.get_token_inline(&mut self.diag)
			{
			Some(t) => t,
			// Null directive
			None => return,
			};
		match token::directive(&name.lexeme)
		{
		Some(TokenKind::Include) => self.include(line),
		Some(TokenKind::Define) => self.define(line),
		Some(TokenKind::Undef) => self.undef(line),
		Some(_) => {
			debug!("#{} on line {} ignored", name.lexeme, line);
			self.lexer.skip_line();
			},
		None => {
			debug!("Unknown directive #{} on line {}", name.lexeme, line);
			self.lexer.skip_line();
			},
		}
	}

	fn include(&mut self, line: usize)
	{
		match self.lexer.include_path(&mut self.diag)
		{
		Some(toks) => {
			debug!("Include {}", toks[1].lexeme);
			self.tokens.push(Token::new(TokenKind::Include, "include", line));
			self.tokens.extend(toks.iter().cloned());
			},
		None => self.diag.lexical(line, LexError::Include),
		}
		self.lexer.skip_line();
	}

	fn define(&mut self, line: usize)
	{
		let ident = match self.lexer.get_token_inline(&mut self.diag)
			{
			Some(t) => if t.kind == TokenKind::Id { t.lexeme } else { String::new() },
			None => String::new(),
			};
		if ident.is_empty() {
			self.diag.lexical(line, LexError::Define);
			self.lexer.skip_line();
			return ;
		}

		// Only a `(` directly after the name makes a function-like macro
		let args = if self.lexer.next_char_is('(')
			{
				self.lexer.get_token_inline(&mut self.diag);
				match self.define_params()
				{
				Some(v) => Some(v),
				None => {
					self.diag.lexical(line, LexError::Define);
					self.lexer.skip_line();
					return ;
					},
				}
			}
			else
			{
				None
			};

		let mut tokens = Vec::new();
		while let Some(tok) = self.lexer.get_token_inline(&mut self.diag)
		{
			match tok.kind
			{
			TokenKind::Hash => debug!("`#` dropped from body of {}", ident),
			_ => tokens.push(tok),
			}
		}

		info!("Define {} = {:?} {:?}", ident, args, tokens);
		self.macros.insert(ident, MacroDefinition {
			arg_names: args,
			expansion: tokens,
			});
	}

	/// Parameter list of a function-like macro, after the `(`
	fn define_params(&mut self) -> Option<Vec<String>>
	{
		let mut names = Vec::new();
		loop
		{
			let tok = self.lexer.get_token_inline(&mut self.diag)?;
			match tok.kind
			{
			TokenKind::RBr if names.is_empty() => return Some(names),
			TokenKind::Id => names.push(tok.lexeme),
			_ => return None,
			}
			let tok = self.lexer.get_token_inline(&mut self.diag)?;
			match tok.kind
			{
			TokenKind::RBr => return Some(names),
			TokenKind::Comma => {},
			_ => return None,
			}
		}
	}

	fn undef(&mut self, line: usize)
	{
		match self.lexer.get_token_inline(&mut self.diag)
		{
		Some(ref t) if t.kind == TokenKind::Id => {
			info!("Undefine {}", t.lexeme);
			self.macros.remove(&t.lexeme);
			},
		_ => self.diag.lexical(line, LexError::Define),
		}
		self.lexer.skip_line();
	}

	fn expand(&mut self, name: Token)
	{
		let macro_def = match self.macros.get(&name.lexeme)
			{
			Some(d) => d.clone(),
			None => {
				self.tokens.push(name);
				return ;
				},
			};
		let line = name.line;

		let args = match macro_def.arg_names
			{
			Some(ref names) => {
				let next = self.lexer.get_token(&mut self.diag);
				if next.kind != TokenKind::LBr {
					// Not an invocation, leave the name alone
					self.saved_tok = Some(next);
					self.tokens.push(name);
					return ;
				}
				let args = self.macro_args(line, names.len());
				debug!("Macro {} with args {:?}", name.lexeme, args);
				args
				},
			None => Vec::new(),
			};

		let mut output_tokens = Vec::new();
		for tok in &macro_def.expansion
		{
			let arg_idx = match macro_def.arg_names
				{
				Some(ref names) if tok.kind == TokenKind::Id => names.iter().position(|n| *n == tok.lexeme),
				_ => None,
				};
			match arg_idx
			{
			// A missing argument expands to nothing
			Some(i) => if let Some(arg) = args.get(i) {
				output_tokens.extend(arg.iter().cloned());
				},
			None => output_tokens.push(tok.clone()),
			}
		}
		for tok in &mut output_tokens
		{
			tok.line = line;
		}
		debug!("Macro expansion {} => {:?}", name.lexeme, output_tokens);
		self.tokens.extend(output_tokens);
	}

	/// Read a macro's arguments, after the `(`. Commas inside nested parentheses don't split.
	fn macro_args(&mut self, line: usize, count: usize) -> Vec<Vec<Token>>
	{
		let mut args = Vec::new();
		let mut cur_arg_toks = Vec::new();
		let mut paren_level: usize = 0;
		loop
		{
			let tok = self.lexer.get_token(&mut self.diag);
			match tok.kind
			{
			TokenKind::End => {
				self.diag.lexical(line, LexError::MacroArguments);
				self.saved_tok = Some(tok);
				break;
				},
			TokenKind::RBr if paren_level == 0 => break,
			TokenKind::Comma if paren_level == 0 => {
				args.push( ::std::mem::replace(&mut cur_arg_toks, Vec::new()) );
				},
			TokenKind::LBr => {
				paren_level += 1;
				cur_arg_toks.push(tok);
				},
			TokenKind::RBr => {
				paren_level -= 1;
				cur_arg_toks.push(tok);
				},
			_ => cur_arg_toks.push(tok),
			}
		}
		// `F()` passes no arguments rather than one empty one
		if !(args.is_empty() && cur_arg_toks.is_empty() && count == 0) {
			args.push(cur_arg_toks);
		}
		if args.len() != count {
			self.diag.lexical(line, LexError::MacroArguments);
		}
		args
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	fn all_tokens(pp: &mut Preproc) -> Vec<Token>
	{
		let mut rv = Vec::new();
		loop
		{
			let t = pp.get_token();
			if t.is_end() {
				break;
			}
			rv.push(t);
		}
		rv
	}
	fn spell(toks: &[Token]) -> Vec<String>
	{
		toks.iter().map(|t| format!("{}:{}", t.kind, t.lexeme)).collect()
	}

	#[test]
	fn object_macro()
	{
		let mut pp = Preproc::new("#define FOO 1+2 // trailing\nFOO;");
		let toks = all_tokens(&mut pp);
		assert_eq!(spell(&toks), ["CONSTANT:1", "PLUS:+", "CONSTANT:2", "SEMI_COLON:;"]);
		assert!(toks.iter().all(|t| t.line == 2));
		assert_eq!(pp.macros()["FOO"].arg_names, None);
	}

	#[test]
	fn function_macro_nested_args()
	{
		let mut pp = Preproc::new("#define ADD(x,y) x+y\nADD(f(a,b), c)");
		let toks = all_tokens(&mut pp);
		assert_eq!(spell(&toks), ["ID:f", "L_BR:(", "ID:a", "COMMA:,", "ID:b", "R_BR:)", "PLUS:+", "ID:c"]);
		assert!(pp.diagnostics().is_empty());
	}

	#[test]
	fn function_macro_without_call()
	{
		let mut pp = Preproc::new("#define F(x) x\nint F;");
		let toks = all_tokens(&mut pp);
		assert_eq!(spell(&toks), ["INT_TYPE:int", "ID:F", "SEMI_COLON:;"]);
	}

	#[test]
	fn macro_argument_count()
	{
		let mut pp = Preproc::new("#define ADD(x,y) x+y\nADD(a);");
		let toks = all_tokens(&mut pp);
		assert_eq!(spell(&toks), ["ID:a", "PLUS:+", "SEMI_COLON:;"]);
		assert_eq!(pp.diagnostics().entries()[0].message, "Macro argument count mismatch");
	}

	#[test]
	fn define_continuation_and_undef()
	{
		let mut pp = Preproc::new("#define A 1 \\\n + 2\nA\n#undef A\nA");
		let toks = all_tokens(&mut pp);
		assert_eq!(spell(&toks), ["CONSTANT:1", "PLUS:+", "CONSTANT:2", "ID:A"]);
		assert_eq!(toks[0].line, 3);
		assert_eq!(toks[3].line, 5);
		assert!(pp.macros().is_empty());
	}

	#[test]
	fn include_tokens()
	{
		let mut pp = Preproc::new("#include <stdio.h>\n#include \"a b.h\"\nx");
		let toks = all_tokens(&mut pp);
		assert_eq!(spell(&toks), ["INCLUDE:include", "LT:<", "INCLUDE_PATH:stdio.h", "GT:>", "ID:x"]);
		let d = pp.diagnostics().entries();
		assert_eq!(d.len(), 1);
		assert_eq!(d[0].line, 2);
		assert_eq!(d[0].message, "Include Syntax is wrong");
	}

	#[test]
	fn unsupported_directives_skip_line()
	{
		let mut pp = Preproc::new("#ifdef X\nint\n#pragma once junk\n#endif\n#warning hi\n;");
		let toks = all_tokens(&mut pp);
		assert_eq!(spell(&toks), ["INT_TYPE:int", "SEMI_COLON:;"]);
		assert!(pp.diagnostics().is_empty());
	}

	#[test]
	fn end_is_sticky()
	{
		let mut pp = Preproc::new("a");
		assert_eq!(pp.get_token().lexeme, "a");
		assert!(pp.get_token().is_end());
		assert!(pp.get_token().is_end());
		pp.unget();
		assert!(pp.peek_token().is_end());
		pp.unget();
		pp.unget();
		assert_eq!(pp.get_token().lexeme, "a");
	}

	#[test]
	fn unget_returns_the_restored_token()
	{
		let mut pp = Preproc::new("a b");
		assert_eq!(pp.unget().lexeme, "a");
		let a = pp.get_token();
		let b = pp.get_token();
		assert_eq!(pp.unget(), b);
		assert_eq!(pp.unget(), a);
		assert_eq!(pp.get_token(), a);
	}

	#[test]
	fn checkpoint_drops_grammar_errors()
	{
		let mut pp = Preproc::new("a b c");
		pp.get_token();
		let cp = pp.checkpoint();
		pp.get_token();
		pp.diagnostics_mut().grammar(1, "oops");
		assert_eq!(pp.peek_nth(0).lexeme, "c");
		pp.restore(cp);
		assert_eq!(pp.diagnostics().grammar_count(), 0);
		assert_eq!(pp.get_token().lexeme, "b");
	}
}
