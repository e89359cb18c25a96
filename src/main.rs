/*!
 * C lexer/parser driver
 *
 * Prints the token stream, the diagnostics, the macro table and then the syntax tree of one `.c` file.
 */
#[macro_use]
extern crate log;
extern crate env_logger;
extern crate structopt;

use std::io::Write;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "cparse")]
struct Options
{
	/// C source file to parse (must end in `.c`)
	#[structopt(parse(from_os_str))]
	input: ::std::path::PathBuf,
}

fn main()
{
	env_logger::init();

	// 1. Parse command line arguments
	let args = Options::from_args();

	match run(&args)
	{
	Ok(()) => {},
	Err(e @ cparse::Error::BadExtension(_)) => {
		eprintln!("{}", e);
		eprintln!("Usage: cparse <file.c>");
		::std::process::exit(1);
		},
	Err(e) => {
		eprintln!("cparse: {}: {}", args.input.display(), e);
		::std::process::exit(1);
		},
	}
}

fn run(args: &Options) -> cparse::Result<()>
{
	let stdout = ::std::io::stdout();
	let mut out = stdout.lock();

	// - Raw token stream, from its own pass over the file
	let mut lex = cparse::Preproc::open(&args.input)?;
	cparse::dump::write_tokens(&mut out, &mut lex)?;

	// - Parse, then report
	let parser = cparse::Parser::from_path(&args.input)?;
	debug!("{} diagnostics", parser.diagnostics().entries().len());
	write!(out, "{}", parser.diagnostics())?;
	cparse::dump::write_macros(&mut out, parser.macros())?;
	cparse::ast::pretty_print::write(&mut out, parser.root())?;
	Ok( () )
}
