//! Text dumps of the token stream and the macro table
use std::collections::HashMap;
use std::io;

use crate::preproc::{MacroDefinition, Preproc};

/// Drain `lex`, writing every token under a `line NO:` header for its line
pub fn write_tokens(mut sink: impl io::Write, lex: &mut Preproc) -> io::Result<()>
{
	let mut cur_line = None;
	loop
	{
		let tok = lex.get_token();
		if tok.is_end() {
			break;
		}
		if cur_line != Some(tok.line) {
			writeln!(sink, "line NO: {}", tok.line)?;
			cur_line = Some(tok.line);
		}
		writeln!(sink, "Type: {} Lexeme: {}", tok.kind, tok.lexeme)?;
	}
	Ok( () )
}

/// Macro table, sorted by name
pub fn write_macros(mut sink: impl io::Write, macros: &HashMap<String,MacroDefinition>) -> io::Result<()>
{
	let mut names: Vec<&String> = macros.keys().collect();
	names.sort();
	for name in names
	{
		let macro_def = &macros[name];
		writeln!(sink, "{}", name)?;
		writeln!(sink, "Tokens:")?;
		for tok in &macro_def.expansion
		{
			writeln!(sink, "Type:\t{}\tLexeme:\t{}", tok.kind, tok.lexeme)?;
		}
		writeln!(sink, "Parameters:")?;
		for p in macro_def.arg_names.iter().flat_map(|v| v.iter())
		{
			writeln!(sink, "parameter:\t{}", p)?;
		}
	}
	Ok( () )
}
