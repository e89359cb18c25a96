//! Whole-program parses through the public API
extern crate cparse;
extern crate proptest;

use std::path::Path;

use cparse::ast::pretty_print;
use cparse::{Node, Parser, TokenKind};
use proptest::prelude::*;

fn parse_ok(src: &str) -> Parser
{
	let p = Parser::from_source("t.c", src);
	assert!(p.diagnostics().is_empty(), "{}", p.diagnostics());
	p
}

fn kinds(node: &Node) -> Vec<TokenKind>
{
	node.children.iter().map(|c| c.kind).collect()
}

#[test]
fn typedef_name_starts_declaration()
{
	let p = parse_ok("typedef int myint;\nmyint x = 3;");
	assert!(p.is_typedef_name("myint"));
	let decl = &p.root().children[1];
	assert_eq!(decl.kind, TokenKind::Declaration);
	let specs = decl.child(TokenKind::DeclarationSpecifiers).unwrap();
	assert_eq!(specs.children.len(), 1);
	assert_eq!(specs.children[0].kind, TokenKind::Id);
	assert_eq!(specs.children[0].lexeme, "myint");
	assert!(decl.find(TokenKind::Initializer).is_some());
}

#[test]
fn unknown_type_name()
{
	let p = Parser::from_source("t.c", "myint x;");
	let d = p.diagnostics().entries();
	assert!(d.iter().all(|e| e.is_grammar()));
	assert_eq!(d[0].message, "unexpected 'myint'");
}

#[test]
fn prototype_then_definition()
{
	let p = parse_ok("int f(int a);\nint f(int a) { return a; }");
	assert_eq!(kinds(p.root()), [TokenKind::Declaration, TokenKind::FunctionDefinition]);
	let proto = &p.root().children[0];
	assert!(!proto.contains(TokenKind::CompoundStatement));
	assert_eq!(proto.children.last().map(|c| c.kind), Some(TokenKind::SemiColon));
	let f = &p.root().children[1];
	assert_eq!(kinds(f), [TokenKind::DeclarationSpecifiers, TokenKind::Declarator, TokenKind::CompoundStatement]);
	assert!(f.find(TokenKind::ParameterDeclaration).is_some());
	assert!(f.find(TokenKind::JumpStatement).is_some());
}

#[test]
fn operator_precedence()
{
	let p = parse_ok("void g(void) { a = b ? c : d + e * f; }");
	let stmt = p.root().find(TokenKind::ExpressionStatement).unwrap();
	let assign = &stmt.children[0];
	assert_eq!(assign.kind, TokenKind::AssignmentExp);
	assert_eq!(kinds(assign), [TokenKind::Id, TokenKind::Assign, TokenKind::ConditionalExp]);

	let cond = &assign.children[2];
	assert_eq!(kinds(cond), [TokenKind::Id, TokenKind::Question, TokenKind::Id, TokenKind::Colon, TokenKind::AdditiveExp]);
	let sum = &cond.children[4];
	assert_eq!(sum.children[0].lexeme, "d");
	assert_eq!(sum.children[2].kind, TokenKind::MultiplicativeExp);
	assert_eq!(sum.children[2].text(), "e * f");
}

#[test]
fn else_binds_to_nearest_if()
{
	let p = parse_ok("void g(void) { if (a) if (b) x; else y; }");
	let outer = p.root().find(TokenKind::SelectionStatement).unwrap();
	assert!(outer.child(TokenKind::Else).is_none());
	let inner = outer.children.last().unwrap();
	assert_eq!(inner.kind, TokenKind::SelectionStatement);
	assert!(inner.child(TokenKind::Else).is_some());
	assert_eq!(inner.children.last().unwrap().text(), "y ;");
}

#[test]
fn missing_semicolon_at_end()
{
	let p = Parser::from_source("t.c", "int x");
	let d = p.diagnostics().entries();
	assert_eq!(d.len(), 1, "{}", p.diagnostics());
	assert_eq!(d[0].message, "expected ';' before end of input");
	assert_eq!(p.diagnostics().grammar_count(), 1);
	let decl = &p.root().children[0];
	assert_eq!(decl.kind, TokenKind::Declaration);
	assert!(decl.child(TokenKind::SemiColon).is_none());
}

#[test]
fn diagnostics_listing()
{
	let p = Parser::from_source("t.c", "int a = 1 @;\nint b");
	assert_eq!(p.diagnostics().to_string(), "\
Line No. 1\tErrors:\tunrecognized character
Line No. 2\tGrammar Error:\texpected ';' before end of input
");
}

#[test]
fn rejects_other_extensions()
{
	match Parser::from_path(Path::new("prog.h"))
	{
	Err(cparse::Error::BadExtension(p)) => assert_eq!(p, Path::new("prog.h")),
	Err(e) => panic!("unexpected error {}", e),
	Ok(_) => panic!("accepted a header"),
	}
	match Parser::from_path(Path::new("/nonexistent/dir/prog.c"))
	{
	Err(cparse::Error::Io(_)) => {},
	Err(e) => panic!("unexpected error {}", e),
	Ok(_) => panic!("parsed a missing file"),
	}
}

#[test]
fn reads_source_file()
{
	let path = ::std::env::temp_dir().join(format!("cparse-read-{}.c", ::std::process::id()));
	::std::fs::write(&path, "#define N 2\nint v[N];\n").unwrap();
	let p = Parser::from_path(&path);
	::std::fs::remove_file(&path).unwrap();
	let p = p.unwrap();
	assert!(p.diagnostics().is_empty(), "{}", p.diagnostics());
	assert!(p.macros().contains_key("N"));
	assert_eq!(p.root().lexeme, path.display().to_string());
	assert!(p.root().find(TokenKind::DirectDeclarator).unwrap().text().contains("[ 2 ]"));
}

#[test]
fn tree_listing()
{
	let p = parse_ok("int x;");
	assert_eq!(pretty_print::to_string(p.root()), "\
Token: TRANSLATION_UNIT lexeme: t.c
└── Token: DECLARATION lexeme: 
    ├── Token: DECLARATION_SPECIFIERS lexeme: 
    │   └── Token: INT_TYPE lexeme: int
    ├── Token: INIT_DECLARATOR_LIST lexeme: 
    │   └── Token: INIT_DECLARATOR lexeme: 
    │       └── Token: DECLARATOR lexeme: 
    │           └── Token: DIRECT_DECLARATOR lexeme: 
    │               └── Token: ID lexeme: x
    └── Token: SEMI_COLON lexeme: ;
");
}

/// Arbitrary token soup, mostly nonsense
fn soup() -> impl Strategy<Value = String>
{
	let piece = prop::sample::select(vec![
		"int", "char", "struct", "typedef", "if", "else", "for", "while", "return", "sizeof", "_Generic",
		"x", "T", "1", "\"s\"", "(", ")", "{", "}", "[", "]", ";", ",", ":", "?", "=", "+", "*", "->", ".",
		"...", "\n",
		]);
	prop::collection::vec(piece, 0..60)
		.prop_map(|parts| parts.join(" "))
}

proptest! {
	#[test]
	fn any_input_yields_a_tree(src in soup())
	{
		let p = Parser::from_source("soup.c", &src);
		prop_assert_eq!(p.root().kind, TokenKind::TranslationUnit);
		let lines = src.lines().count().max(1);
		for d in p.diagnostics().entries()
		{
			prop_assert!(d.line >= 1 && d.line <= lines + 1, "{} (of {} lines)", d, lines);
		}
	}

	#[test]
	fn one_declaration_per_name(names in prop::collection::vec("[a-z][a-z0-9_]{0,6}", 1..6))
	{
		// Skip anything that collides with a keyword
		prop_assume!(names.iter().all(|n| cparse::preproc::token::keyword(n).is_none()));
		let src: String = names.iter().map(|n| format!("int {};\n", n)).collect();
		let p = Parser::from_source("t.c", &src);
		prop_assert!(p.diagnostics().is_empty());
		prop_assert_eq!(p.root().children.len(), names.len());
		for (decl, name) in p.root().children.iter().zip(&names)
		{
			prop_assert_eq!(&decl.find(TokenKind::DirectDeclarator).unwrap().text(), name);
		}
	}
}
