//! Raw character scanner
//!
//! Produces one token at a time from the source text. Directives and macros are not handled here, the
//! scanner only reports `#` and offers the line-bounded helpers the pre-processor needs.
use super::token::{self, Token, TokenKind};
use crate::diagnostics::{Diagnostics, LexError};

pub struct Lexer
{
	chars: Vec<char>,
	pos: usize,
	line: usize,
}

impl Lexer
{
	pub fn new(src: &str) -> Lexer
	{
		Lexer {
			chars: src.chars().collect(),
			pos: 0,
			line: 1,
			}
	}

	/// Current (1-based) line
	pub fn line(&self) -> usize
	{
		self.line
	}

	fn peekc(&self) -> Option<char>
	{
		self.chars.get(self.pos).cloned()
	}
	fn peekc_at(&self, ofs: usize) -> Option<char>
	{
		self.chars.get(self.pos + ofs).cloned()
	}
	fn getc(&mut self) -> Option<char>
	{
		let rv = self.peekc();
		if let Some(c) = rv
		{
			self.pos += 1;
			if c == '\n' {
				self.line += 1;
			}
		}
		rv
	}
	/// Consume `ch` if it's the next character
	fn eatc(&mut self, ch: char) -> bool
	{
		if self.peekc() == Some(ch) {
			self.getc();
			true
		}
		else {
			false
		}
	}

	/// Checks the very next character (no whitespace skipping)
	pub fn next_char_is(&self, ch: char) -> bool
	{
		self.peekc() == Some(ch)
	}

	/// Length of a backslash-newline sequence at the cursor (zero if there isn't one)
	fn escaped_newline_len(&self) -> usize
	{
		match (self.peekc(), self.peekc_at(1), self.peekc_at(2))
		{
		(Some('\\'), Some('\n'), _) => 2,
		(Some('\\'), Some('\r'), Some('\n')) => 3,
		_ => 0,
		}
	}

	/// Skip whitespace, escaped newlines and comments.
	///
	/// With `inline` set this stops in front of an unescaped newline. Returns false if stopped by a newline or
	/// by the end of input.
	fn skip_space(&mut self, diag: &mut Diagnostics, inline: bool) -> bool
	{
		loop
		{
			let esc = self.escaped_newline_len();
			if esc > 0 {
				for _ in 0 .. esc {
					self.getc();
				}
				continue ;
			}
			match self.peekc()
			{
			None => return false,
			Some('\n') if inline => return false,
			Some(c) if c.is_whitespace() => {
				self.getc();
				},
			Some('/') if self.peekc_at(1) == Some('/') => {
				while let Some(c) = self.peekc()
				{
					if c == '\n' {
						break;
					}
					self.getc();
				}
				},
			Some('/') if self.peekc_at(1) == Some('*') => {
				self.block_comment(diag);
				},
			_ => return true,
			}
		}
	}

	fn block_comment(&mut self, diag: &mut Diagnostics)
	{
		let line = self.line;
		self.pos += 2;
		loop
		{
			match self.getc()
			{
			None => {
				diag.lexical(line, LexError::Comment);
				return ;
				},
			Some('*') if self.peekc() == Some('/') => {
				self.pos += 1;
				return ;
				},
			Some(_) => {},
			}
		}
	}

	/// Fetch the next token, `End` once the input is exhausted
	pub fn get_token(&mut self, diag: &mut Diagnostics) -> Token
	{
		loop
		{
			self.skip_space(diag, false);
			if let Some(tok) = self.scan(diag) {
				return tok;
			}
		}
	}

	/// Fetch the next token on the current logical line
	pub fn get_token_inline(&mut self, diag: &mut Diagnostics) -> Option<Token>
	{
		loop
		{
			if !self.skip_space(diag, true) {
				return None;
			}
			if let Some(tok) = self.scan(diag) {
				return Some(tok);
			}
		}
	}

	/// Discard everything up to (not including) the next unescaped newline
	pub fn skip_line(&mut self)
	{
		loop
		{
			let esc = self.escaped_newline_len();
			if esc > 0 {
				for _ in 0 .. esc {
					self.getc();
				}
				continue ;
			}
			match self.peekc()
			{
			None | Some('\n') => break,
			Some(_) => { self.getc(); },
			}
		}
	}

	/// Read the `<path>` or `"path"` operand of `#include`, as (open, INCLUDE_PATH, close) tokens
	pub fn include_path(&mut self, diag: &mut Diagnostics) -> Option<[Token; 3]>
	{
		if !self.skip_space(diag, true) {
			return None;
		}
		let line = self.line;
		let (close, open_kind, close_kind) = match self.peekc()
			{
			Some('<') => ('>', TokenKind::Lt, TokenKind::Gt),
			Some('"') => ('"', TokenKind::DoubleQuote, TokenKind::DoubleQuote),
			_ => return None,
			};
		let open = self.chars[self.pos];
		self.pos += 1;
		let mut path = String::new();
		loop
		{
			match self.peekc()
			{
			Some(c) if c == close => {
				self.pos += 1;
				break;
				},
			// Whitespace (including the end of the line) or a stray opener inside the path
			Some(c) if c.is_whitespace() || c == '<' => return None,
			None => return None,
			Some(c) => {
				self.pos += 1;
				path.push(c);
				},
			}
		}
		if path.is_empty() {
			return None;
		}
		Some([
			Token::new(open_kind, open.to_string(), line),
			Token::new(TokenKind::IncludePath, path, line),
			Token::new(close_kind, close.to_string(), line),
			])
	}

	/// Scan one token starting at a non-space character. `None` means a character was discarded.
	fn scan(&mut self, diag: &mut Diagnostics) -> Option<Token>
	{
		let line = self.line;
		let c = match self.peekc()
			{
			None => return Some(Token::new(TokenKind::End, "", line)),
			Some(c) => c,
			};
		Some(match c
		{
		'"' => self.string_literal(diag),
		'\'' => self.char_constant(diag),
		'#' => {
			self.pos += 1;
			Token::new(TokenKind::Hash, "#", line)
			},
		'.' => self.dot(diag),
		'0' ..= '9' => self.number(diag),
		c if c.is_alphabetic() || c == '_' => self.word(),
		c if token::begins_operator(c) => self.operator(diag),
		c => match token::symbol(c)
			{
			Some(kind) => {
				self.pos += 1;
				Token::new(kind, c.to_string(), line)
				},
			None => {
				diag.lexical(line, LexError::UnrecognizedCharacter);
				self.getc();
				return None;
				},
			},
		})
	}

	fn word(&mut self) -> Token
	{
		let line = self.line;
		let mut s = String::new();
		while let Some(c) = self.peekc()
		{
			if !(c.is_alphanumeric() || c == '_') {
				break;
			}
			s.push(c);
			self.pos += 1;
		}
		match token::keyword(&s)
		{
		Some(kind) => Token::new(kind, s, line),
		None => Token::new(TokenKind::Id, s, line),
		}
	}

	fn operator(&mut self, diag: &mut Diagnostics) -> Token
	{
		let line = self.line;
		let c1 = self.chars[self.pos];
		self.pos += 1;

		let mut s = c1.to_string();
		if let Some(c2) = self.peekc()
		{
			s.push(c2);
			if token::operator(&s).is_some() {
				self.pos += 1;
				if self.peekc() == Some('=') {
					s.push('=');
					if let Some(kind) = token::operator(&s) {
						self.pos += 1;
						return Token::new(kind, s, line);
					}
					s.pop();
					// `p++=x` is a postfix increment followed by an assignment
					if s != "++" && s != "--" {
						diag.lexical(line, LexError::UnrecognizedToken);
					}
				}
			}
			else {
				s.pop();
			}
		}
		match token::operator(&s)
		{
		Some(kind) => Token::new(kind, s, line),
		None => {
			diag.lexical(line, LexError::UnrecognizedToken);
			Token::new(TokenKind::Id, s, line)
			},
		}
	}

	fn dot(&mut self, diag: &mut Diagnostics) -> Token
	{
		let line = self.line;
		self.pos += 1;
		match self.peekc()
		{
		Some(c) if c.is_ascii_digit() => {
			let mut s = "0.".to_owned();
			self.decimal_tail(&mut s, true, diag);
			Token::new(TokenKind::Constant, s, line)
			},
		Some('.') if self.peekc_at(1) == Some('.') => {
			self.pos += 2;
			Token::new(TokenKind::Ellipsis, "...", line)
			},
		_ => Token::new(TokenKind::Dot, ".", line),
		}
	}

	fn number(&mut self, diag: &mut Diagnostics) -> Token
	{
		let line = self.line;
		let mut s = String::new();
		if self.peekc() == Some('0') && (self.peekc_at(1) == Some('x') || self.peekc_at(1) == Some('X'))
		{
			s.push(self.chars[self.pos]);
			s.push(self.chars[self.pos+1]);
			self.pos += 2;
			while let Some(c) = self.peekc()
			{
				match c
				{
				'0' ..= '9' | 'a' ..= 'f' | 'A' ..= 'F' | 'u' | 'U' | 'l' | 'L' => {
					s.push(c);
					self.pos += 1;
					},
				_ => break,
				}
			}
		}
		else
		{
			self.decimal_tail(&mut s, false, diag);
		}
		Token::new(TokenKind::Constant, s, line)
	}

	/// Digits, an optional fraction and exponent, then any suffix letters
	fn decimal_tail(&mut self, s: &mut String, mut seen_dot: bool, diag: &mut Diagnostics)
	{
		let line = self.line;
		let mut seen_exp = false;
		while let Some(c) = self.peekc()
		{
			match c
			{
			'0' ..= '9' => {},
			'.' if !seen_dot && !seen_exp => {
				seen_dot = true;
				},
			'e' | 'E' if !seen_exp => {
				seen_exp = true;
				s.push(c);
				self.pos += 1;
				match self.peekc()
				{
				Some('+') => {},
				// Accepted, but only `+` is sanctioned
				Some('-') => {
					diag.lexical(line, LexError::FloatExponent);
					},
				_ => {
					diag.lexical(line, LexError::FloatExponent);
					continue ;
					},
				}
				s.push(self.chars[self.pos]);
				self.pos += 1;
				continue ;
				},
			_ => break,
			}
			s.push(c);
			self.pos += 1;
		}
		while let Some(c) = self.peekc()
		{
			match c
			{
			'f' | 'F' | 'l' | 'L' | 'u' | 'U' => {
				s.push(c);
				self.pos += 1;
				},
			_ => break,
			}
		}
	}

	/// Decode the escape following a consumed `\`
	fn escape(&mut self, diag: &mut Diagnostics) -> Option<char>
	{
		let line = self.line;
		let c = match self.peekc()
			{
			None => {
				diag.lexical(line, LexError::Escape);
				return None;
				},
			Some(c) => c,
			};
		if c == '\n' {
			// Line continuation
			self.getc();
			return None;
		}
		self.pos += 1;
		Some(match c
		{
		'n' => '\n',
		't' => '\t',
		'r' => '\r',
		'a' => '\x07',
		'b' => '\x08',
		'v' => '\x0b',
		'f' => '\x0c',
		'\\' | '\'' | '"' | '?' => c,
		'0' ..= '7' => {
			let mut val = c as u32 - '0' as u32;
			for _ in 0 .. 2
			{
				match self.peekc()
				{
				Some(d @ '0' ..= '7') => {
					val = val * 8 + (d as u32 - '0' as u32);
					self.pos += 1;
					},
				_ => break,
				}
			}
			::std::char::from_u32(val).unwrap_or('\0')
			},
		'x' => {
			let mut val = 0;
			let mut count = 0;
			while count < 2
			{
				match self.peekc().and_then(|d| d.to_digit(16))
				{
				Some(d) => {
					val = val * 16 + d;
					self.pos += 1;
					count += 1;
					},
				None => break,
				}
			}
			if count == 0 {
				diag.lexical(line, LexError::Escape);
				return None;
			}
			::std::char::from_u32(val).unwrap_or('\0')
			},
		_ => {
			diag.lexical(line, LexError::Escape);
			c
			},
		})
	}

	fn string_literal(&mut self, diag: &mut Diagnostics) -> Token
	{
		let line = self.line;
		self.pos += 1;
		let mut s = String::new();
		loop
		{
			match self.peekc()
			{
			None | Some('\n') => {
				diag.lexical(line, LexError::String);
				break;
				},
			Some('"') => {
				self.pos += 1;
				break;
				},
			Some('\\') => {
				self.pos += 1;
				if let Some(c) = self.escape(diag) {
					s.push(c);
				}
				},
			Some(c) => {
				self.pos += 1;
				s.push(c);
				},
			}
		}
		Token::new(TokenKind::StringLiteral, s, line)
	}

	/// Character constant, the lexeme keeps its quotes
	fn char_constant(&mut self, diag: &mut Diagnostics) -> Token
	{
		let line = self.line;
		self.pos += 1;
		let ch = match self.peekc()
			{
			None | Some('\n') | Some('\'') => {
				diag.lexical(line, LexError::Char);
				None
				},
			Some('\\') => {
				self.pos += 1;
				self.escape(diag)
				},
			Some(c) => {
				self.pos += 1;
				Some(c)
				},
			};
		if !self.eatc('\'')
		{
			diag.lexical(line, LexError::Char);
			while let Some(c) = self.peekc()
			{
				if c == '\n' {
					break;
				}
				self.pos += 1;
				if c == '\'' {
					break;
				}
			}
		}
		let mut s = "'".to_owned();
		s.extend(ch);
		s.push('\'');
		Token::new(TokenKind::Constant, s, line)
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	fn lex_all(src: &str) -> (Vec<Token>, Diagnostics)
	{
		let mut diag = Diagnostics::new();
		let mut lex = Lexer::new(src);
		let mut rv = Vec::new();
		loop
		{
			let t = lex.get_token(&mut diag);
			if t.is_end() {
				break;
			}
			rv.push(t);
		}
		(rv, diag)
	}
	fn kinds(toks: &[Token]) -> Vec<TokenKind>
	{
		toks.iter().map(|t| t.kind).collect()
	}

	#[test]
	fn maximal_munch()
	{
		use super::TokenKind::*;
		let (toks, diag) = lex_all("a<<=b>>c&&d|e||f^=g->h");
		assert_eq!(kinds(&toks), [Id, LeftAssign, Id, RightShift, Id, And, Id, BitOr, Id, Or, Id, XorAssign, Id, Arrow, Id]);
		assert!(diag.is_empty());
	}

	#[test]
	fn postfix_then_assign()
	{
		use super::TokenKind::*;
		let (toks, diag) = lex_all("*p++=c;");
		assert_eq!(kinds(&toks), [Mul, Id, Inc, Assign, Id, SemiColon]);
		assert!(diag.is_empty());
	}

	#[test]
	fn bad_three_char_operator()
	{
		let (toks, diag) = lex_all("a +== b");
		assert_eq!(toks[1].kind, TokenKind::AddAssign);
		assert_eq!(toks[2].kind, TokenKind::Assign);
		assert_eq!(diag.entries()[0].message, "unrecognized token");
	}

	#[test]
	fn dots()
	{
		use super::TokenKind::*;
		let (toks, _) = lex_all("s.x .5 f(...)");
		assert_eq!(kinds(&toks), [Id, Dot, Id, Constant, Id, LBr, Ellipsis, RBr]);
		assert_eq!(toks[3].lexeme, "0.5");
	}

	#[test]
	fn numbers()
	{
		let (toks, diag) = lex_all("0x1Fu 12.5e+3f 10UL");
		let lexemes: Vec<_> = toks.iter().map(|t| &t.lexeme[..]).collect();
		assert_eq!(lexemes, ["0x1Fu", "12.5e+3f", "10UL"]);
		assert!(diag.is_empty());

		let (toks, diag) = lex_all("1e5;");
		assert_eq!(toks[0].lexeme, "1e5");
		assert_eq!(toks[1].kind, TokenKind::SemiColon);
		assert_eq!(diag.entries()[0].message, "float type error");
	}

	#[test]
	fn char_constants()
	{
		let (toks, diag) = lex_all(r"'a' '\n' '\0'");
		assert_eq!(toks[0].lexeme, "'a'");
		assert_eq!(toks[1].lexeme, "'\n'");
		assert_eq!(toks[2].lexeme, "'\0'");
		assert!(diag.is_empty());

		let (toks, diag) = lex_all("'ab' x");
		assert_eq!(toks.len(), 2);
		assert_eq!(diag.entries()[0].message, "Incorrect Char Syntax");
	}

	#[test]
	fn string_escapes()
	{
		let (toks, diag) = lex_all(r#""\x41\101\q""#);
		assert_eq!(toks[0].lexeme, "AAq");
		assert_eq!(diag.entries()[0].message, "Incorrect Escape Character");
	}

	#[test]
	fn unterminated_string()
	{
		let (toks, diag) = lex_all("\"abc\nx");
		assert_eq!(toks[0].kind, TokenKind::StringLiteral);
		assert_eq!(toks[0].lexeme, "abc");
		assert_eq!(toks[1].line, 2);
		assert_eq!(diag.entries()[0].line, 1);
	}

	#[test]
	fn comments_and_lines()
	{
		let (toks, diag) = lex_all("a // one\n/* two\nthree */ b \\\n c /* open");
		assert_eq!(toks.len(), 3);
		assert_eq!(toks[1].line, 3);
		assert_eq!(toks[2].line, 4);
		assert_eq!(diag.entries()[0].message, "Comment Error: Missing close symbol");
	}

	#[test]
	fn unknown_character()
	{
		let (toks, diag) = lex_all("a @ b");
		assert_eq!(toks.len(), 2);
		assert_eq!(diag.lexical_count(), 1);
	}

	#[test]
	fn include_operand()
	{
		let mut diag = Diagnostics::new();
		let mut lex = Lexer::new(" <stdio.h>\n");
		let [o, p, c] = lex.include_path(&mut diag).unwrap();
		assert_eq!((o.kind, &p.lexeme[..], c.kind), (TokenKind::Lt, "stdio.h", TokenKind::Gt));

		let mut lex = Lexer::new(" <std io.h>\n");
		assert!(lex.include_path(&mut diag).is_none());
	}
}
