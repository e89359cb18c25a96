/*!
 * C lexer and recursive-descent parser, producing a concrete syntax tree with diagnostics
 */
#[macro_use]
extern crate log;

use std::fmt;
use std::path::{Path, PathBuf};

pub mod diagnostics;
pub mod preproc;
pub mod ast;
pub mod parse;
pub mod dump;

pub use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, LexError};
pub use crate::preproc::{MacroDefinition, Preproc, Token, TokenKind};
pub use crate::ast::Node;
pub use crate::parse::Parser;

/// Failures that stop processing before any parsing happens
#[derive(Debug)]
pub enum Error
{
	/// Any form of IO error
	Io(::std::io::Error),
	/// The input isn't a `.c` file
	BadExtension(PathBuf),
}

pub type Result<T> = ::std::result::Result<T,Error>;

impl From<::std::io::Error> for Error
{
	fn from(e: ::std::io::Error) -> Self
	{
		Error::Io(e)
	}
}

impl fmt::Display for Error
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
	{
		match self
		{
		Error::Io(e) => write!(f, "I/O error: {}", e),
		Error::BadExtension(p) => write!(f, "{}: expected a .c source file", p.display()),
		}
	}
}

impl ::std::error::Error for Error
{
	fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)>
	{
		match self
		{
		Error::Io(e) => Some(e),
		Error::BadExtension(_) => None,
		}
	}
}

/// Accept only paths ending in `.c`
pub fn check_extension(path: &Path) -> Result<()>
{
	match path.extension()
	{
	Some(ext) if ext == "c" => Ok( () ),
	_ => Err(Error::BadExtension(path.to_owned())),
	}
}
