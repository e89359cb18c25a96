/*
 * Top-level parser: translation unit, declarations, initialisers and statements
 */
use crate::ast::Node;
use crate::preproc::TokenKind;

impl super::ParseState
{
	pub(super) fn translation_unit(&mut self, name: &str) -> Node
	{
		let mut root = Node::with_lexeme(TokenKind::TranslationUnit, name);
		loop
		{
			let tok = self.lex.peek_token();
			debug!("translation_unit: tok={}", tok);
			match tok.kind
			{
			TokenKind::End => break,
			TokenKind::Include => {
				let n = self.include_stmt();
				root.push(n);
				},
			_ => {
				if let Some(n) = self.list_item(|s| s.external_declaration()) {
					root.push(n);
				}
				},
			}
		}
		root
	}

	/// INCLUDE marker followed by open, path, close
	fn include_stmt(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::IncludeStmt);
		self.lex.get_token();
		for _ in 0 .. 3
		{
			self.take_into(&mut node);
		}
		node
	}

	/// Function definition or declaration. Consumes nothing if the next token can't start either.
	fn external_declaration(&mut self) -> Node
	{
		let tok = self.lex.peek_token();
		if tok.kind == TokenKind::StaticAssert {
			return self.static_assert_declaration();
		}
		if !self.starts_declaration(&tok) {
			return Node::new(TokenKind::Declaration);
		}
		if self.is_function_definition() {
			debug!("external_declaration: function definition at line {}", tok.line);
			self.function_definition()
		}
		else {
			debug!("external_declaration: declaration at line {}", tok.line);
			self.declaration()
		}
	}

	/// Scan past the specifiers and the declarator to see whether a body follows
	fn is_function_definition(&mut self) -> bool
	{
		self.lookahead(|s| {
			let mut seen_type = false;
			loop
			{
				let tok = s.lex.get_token();
				match tok.kind
				{
				TokenKind::Struct | TokenKind::Union | TokenKind::Enum => {
					seen_type = true;
					if s.matches(TokenKind::Id) {
						s.lex.get_token();
					}
					if s.matches(TokenKind::LCur) {
						s.skip_balanced();
					}
					},
				TokenKind::Atomic | TokenKind::Alignas if s.matches(TokenKind::LBr) => {
					seen_type |= tok.kind == TokenKind::Atomic;
					s.skip_balanced();
					},
				k if k.is_type_specifier() => seen_type = true,
				k if k.is_storage_class() || k.is_type_qualifier() || k.is_function_specifier() => {},
				TokenKind::Id if !seen_type && s.is_typedef_name(&tok.lexeme) => seen_type = true,
				_ => {
					s.lex.unget();
					break;
					},
				}
			}

			let mut depth = 0usize;
			// Set right after a depth-0 `)`, i.e. a parameter list closing the declarator
			let mut after_params = false;
			loop
			{
				let tok = s.lex.get_token();
				match tok.kind
				{
				TokenKind::LBr | TokenKind::LSqr => depth += 1,
				TokenKind::RBr | TokenKind::RSqr => depth = depth.saturating_sub(1),
				TokenKind::End => return false,
				TokenKind::LCur if depth == 0 => return true,
				TokenKind::SemiColon | TokenKind::Assign | TokenKind::Comma if depth == 0 => return false,
				// Old-style parameter declarations between the declarator and the body
				_ if depth == 0 && after_params && s.starts_declaration(&tok) => return true,
				_ => {},
				}
				after_params = depth == 0 && tok.kind == TokenKind::RBr;
			}
		})
	}

	/// Skip a bracketed group starting at the next token
	fn skip_balanced(&mut self)
	{
		let mut depth = 0usize;
		loop
		{
			match self.lex.get_token().kind
			{
			TokenKind::LCur | TokenKind::LBr | TokenKind::LSqr => depth += 1,
			TokenKind::RCur | TokenKind::RBr | TokenKind::RSqr => {
				depth = depth.saturating_sub(1);
				if depth == 0 {
					return ;
				}
				},
			TokenKind::End => return,
			_ => {},
			}
		}
	}

	fn function_definition(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::FunctionDefinition);
		let specs = self.declaration_specifiers();
		node.push(specs);
		let decl = self.declarator();
		node.push(decl);

		if !self.matches(TokenKind::LCur)
		{
			let mut list = Node::new(TokenKind::DeclarationList);
			loop
			{
				let tok = self.lex.peek_token();
				if !self.starts_declaration(&tok) {
					break;
				}
				let d = self.declaration();
				list.push(d);
			}
			if !list.children.is_empty() {
				node.push(list);
			}
		}
		let body = self.compound_statement();
		node.push(body);
		node
	}

	/// `declaration-specifiers init-declarator-list? ;`
	pub(super) fn declaration(&mut self) -> Node
	{
		if self.matches(TokenKind::StaticAssert) {
			return self.static_assert_declaration();
		}
		let mut node = Node::new(TokenKind::Declaration);
		let specs = self.declaration_specifiers();
		let is_typedef = specs.child(TokenKind::Typedef).is_some();
		node.push(specs);
		if peek_token!(self, Id | Mul | LBr) {
			let list = self.init_declarator_list(is_typedef);
			node.push(list);
		}
		self.expect_into(&mut node, TokenKind::SemiColon, "';'");
		node
	}

	fn init_declarator_list(&mut self, is_typedef: bool) -> Node
	{
		let mut node = Node::new(TokenKind::InitDeclaratorList);
		loop
		{
			let d = self.init_declarator(is_typedef);
			node.push(d);
			if !self.eat_into(&mut node, TokenKind::Comma) {
				break;
			}
		}
		node
	}

	fn init_declarator(&mut self, is_typedef: bool) -> Node
	{
		let mut node = Node::new(TokenKind::InitDeclarator);
		let decl = self.declarator();
		// Registered straight away, the initialiser (and the next declarator) may already use the name
		if is_typedef {
			self.register_typedef(&decl);
		}
		node.push(decl);
		if self.eat_into(&mut node, TokenKind::Assign) {
			let init = self.initializer();
			node.push(init);
		}
		node
	}

	/// `_Static_assert ( constant-expression [, string-literal] ) ;`
	pub(super) fn static_assert_declaration(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::StaticAssertDeclaration);
		self.take_into(&mut node);
		self.expect_into(&mut node, TokenKind::LBr, "'('");
		let e = self.conditional_expression();
		node.push(e);
		if self.eat_into(&mut node, TokenKind::Comma) {
			self.expect_into(&mut node, TokenKind::StringLiteral, "string literal");
		}
		self.expect_into(&mut node, TokenKind::RBr, "')'");
		self.expect_into(&mut node, TokenKind::SemiColon, "';'");
		node
	}

	// ----------------------------------------------------------------
	// Initialisers
	// ----------------------------------------------------------------
	pub(super) fn initializer(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::Initializer);
		if self.eat_into(&mut node, TokenKind::LCur)
		{
			if !self.matches(TokenKind::RCur) {
				let list = self.initializer_list();
				node.push(list);
			}
			self.expect_into(&mut node, TokenKind::RCur, "'}'");
		}
		else
		{
			let e = self.assignment_expression();
			node.push(e);
		}
		node
	}

	/// Comma-separated (optionally designated) initialisers, a trailing comma is allowed
	pub(super) fn initializer_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::InitializerList);
		loop
		{
			if peek_token!(self, RCur | End) {
				break;
			}
			// Wrapped so a stray token drops both halves together
			let item = self.list_item(|s| {
				let mut item = Node::new(TokenKind::InitializerList);
				if peek_token!(s, LSqr | Dot) {
					let d = s.designation();
					item.push(d);
				}
				let init = s.initializer();
				item.push(init);
				item
				});
			if let Some(item) = item {
				node.children.extend(item.children);
			}
			if !self.eat_into(&mut node, TokenKind::Comma) {
				break;
			}
		}
		node
	}

	fn designation(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::Designation);
		let list = self.designator_list();
		node.push(list);
		self.expect_into(&mut node, TokenKind::Assign, "'='");
		node
	}

	fn designator_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::DesignatorList);
		while peek_token!(self, LSqr | Dot)
		{
			let d = self.designator();
			node.push(d);
		}
		node
	}

	/// `[ constant-expression ]` or `. identifier`
	fn designator(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::Designator);
		if self.eat_into(&mut node, TokenKind::LSqr)
		{
			let e = self.conditional_expression();
			node.push(e);
			self.expect_into(&mut node, TokenKind::RSqr, "']'");
		}
		else
		{
			self.take_into(&mut node);
			self.expect_into(&mut node, TokenKind::Id, "field name");
		}
		node
	}

	// ----------------------------------------------------------------
	// Statements
	// ----------------------------------------------------------------
	pub(super) fn statement(&mut self) -> Node
	{
		let tok = self.lex.peek_token();
		match tok.kind
		{
		TokenKind::Id if self.peek_kind_nth(1) == TokenKind::Colon => self.labeled_statement(),
		TokenKind::Case | TokenKind::Default => self.labeled_statement(),
		TokenKind::LCur => self.compound_statement(),
		TokenKind::If | TokenKind::Switch => self.selection_statement(),
		TokenKind::While | TokenKind::Do | TokenKind::For => self.iteration_statement(),
		TokenKind::Goto | TokenKind::Continue | TokenKind::Break | TokenKind::Return => self.jump_statement(),
		_ => self.expression_statement(),
		}
	}

	fn labeled_statement(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::LabeledStatement);
		match self.peek_kind()
		{
		TokenKind::Case => {
			self.take_into(&mut node);
			let e = self.conditional_expression();
			node.push(e);
			},
		// label or `default`
		_ => {
			self.take_into(&mut node);
			},
		}
		self.expect_into(&mut node, TokenKind::Colon, "':'");
		let s = self.statement();
		node.push(s);
		node
	}

	pub(super) fn compound_statement(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::CompoundStatement);
		self.expect_into(&mut node, TokenKind::LCur, "'{'");
		if !peek_token!(self, RCur | End) {
			let items = self.block_item_list();
			node.push(items);
		}
		self.expect_into(&mut node, TokenKind::RCur, "'}'");
		node
	}

	fn block_item_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::BlockItemList);
		while !peek_token!(self, RCur | End)
		{
			if let Some(item) = self.list_item(|s| s.block_item()) {
				node.push(item);
			}
		}
		node
	}

	fn block_item(&mut self) -> Node
	{
		if self.starts_block_declaration() {
			self.declaration()
		}
		else {
			self.statement()
		}
	}

	/// A typedef name followed by something only an expression could continue with is a use of an
	/// ordinary identifier.
	fn starts_block_declaration(&mut self) -> bool
	{
		let tok = self.lex.peek_token();
		if tok.kind == TokenKind::Id
		{
			if !self.is_typedef_name(&tok.lexeme) {
				return false;
			}
			let next = self.peek_kind_nth(1);
			match next
			{
			TokenKind::Colon | TokenKind::Dot | TokenKind::Arrow | TokenKind::Inc | TokenKind::Dec | TokenKind::LSqr => false,
			k => !k.is_assignment_operator(),
			}
		}
		else
		{
			self.starts_declaration(&tok)
		}
	}

	fn selection_statement(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::SelectionStatement);
		let is_if = self.matches(TokenKind::If);
		self.take_into(&mut node);
		self.expect_into(&mut node, TokenKind::LBr, "'('");
		let e = self.expression();
		node.push(e);
		self.expect_into(&mut node, TokenKind::RBr, "')'");
		let body = self.statement();
		node.push(body);
		// The innermost `if` claims the `else`
		if is_if && self.eat_into(&mut node, TokenKind::Else) {
			let s = self.statement();
			node.push(s);
		}
		node
	}

	fn iteration_statement(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::IterationStatement);
		match self.peek_kind()
		{
		TokenKind::While => {
			self.take_into(&mut node);
			self.expect_into(&mut node, TokenKind::LBr, "'('");
			let e = self.expression();
			node.push(e);
			self.expect_into(&mut node, TokenKind::RBr, "')'");
			let body = self.statement();
			node.push(body);
			},
		TokenKind::Do => {
			self.take_into(&mut node);
			let body = self.statement();
			node.push(body);
			self.expect_into(&mut node, TokenKind::While, "'while'");
			self.expect_into(&mut node, TokenKind::LBr, "'('");
			let e = self.expression();
			node.push(e);
			self.expect_into(&mut node, TokenKind::RBr, "')'");
			self.expect_into(&mut node, TokenKind::SemiColon, "';'");
			},
		_ => {
			self.take_into(&mut node);
			self.expect_into(&mut node, TokenKind::LBr, "'('");
			let init = if self.starts_block_declaration() {
					self.declaration()
				}
				else {
					self.expression_statement()
				};
			node.push(init);
			let cond = self.expression_statement();
			node.push(cond);
			if !self.matches(TokenKind::RBr) {
				let step = self.expression();
				node.push(step);
			}
			self.expect_into(&mut node, TokenKind::RBr, "')'");
			let body = self.statement();
			node.push(body);
			},
		}
		node
	}

	fn jump_statement(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::JumpStatement);
		match self.peek_kind()
		{
		TokenKind::Goto => {
			self.take_into(&mut node);
			self.expect_into(&mut node, TokenKind::Id, "label name");
			},
		TokenKind::Return => {
			self.take_into(&mut node);
			if !self.matches(TokenKind::SemiColon) {
				let e = self.expression();
				node.push(e);
			}
			},
		_ => {
			self.take_into(&mut node);
			},
		}
		self.expect_into(&mut node, TokenKind::SemiColon, "';'");
		node
	}

	/// `expression? ;`
	fn expression_statement(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::ExpressionStatement);
		if !self.matches(TokenKind::SemiColon) {
			let e = self.expression();
			node.push(e);
		}
		self.expect_into(&mut node, TokenKind::SemiColon, "';'");
		node
	}
}

#[cfg(test)]
mod tests
{
	use crate::parse::Parser;
	use crate::preproc::TokenKind;

	fn parse_ok(src: &str) -> Parser
	{
		let p = Parser::from_source("t.c", src);
		assert!(p.diagnostics().is_empty(), "{}", p.diagnostics());
		p
	}

	#[test]
	fn include_statement()
	{
		let p = parse_ok("#include <stdio.h>\nint x;");
		let inc = &p.root().children[0];
		assert_eq!(inc.kind, TokenKind::IncludeStmt);
		assert_eq!(inc.text(), "< stdio.h >");
		assert_eq!(p.root().children[1].kind, TokenKind::Declaration);
	}

	#[test]
	fn old_style_definition()
	{
		let p = parse_ok("int add(a, b) int a; int b; { return a + b; }");
		let f = &p.root().children[0];
		assert_eq!(f.kind, TokenKind::FunctionDefinition);
		assert_eq!(f.child(TokenKind::DeclarationList).map(|l| l.children.len()), Some(2));
		assert!(f.find(TokenKind::IdentifierList).is_some());
	}

	#[test]
	fn old_style_typedef_parameter()
	{
		let p = parse_ok("typedef int T; int f(a) T a; { return a; }");
		let f = &p.root().children[1];
		assert_eq!(f.kind, TokenKind::FunctionDefinition);
		let list = f.child(TokenKind::DeclarationList).unwrap();
		assert_eq!(list.children.len(), 1);
		assert_eq!(list.children[0].child(TokenKind::DeclarationSpecifiers).unwrap().text(), "T");
	}

	#[test]
	fn missing_semicolon_before_next_declaration()
	{
		let p = Parser::from_source("t.c", "int x\nint y;");
		let kinds: Vec<_> = p.root().children.iter().map(|c| c.kind).collect();
		assert_eq!(kinds, [TokenKind::Declaration, TokenKind::Declaration]);
		let d = p.diagnostics().entries();
		assert_eq!(d.len(), 1, "{}", p.diagnostics());
		assert_eq!(d[0].message, "expected ';' before 'int'");
		assert_eq!(d[0].line, 2);
	}

	#[test]
	fn struct_body_is_not_a_function()
	{
		let p = parse_ok("struct S { int a; } s = { 1 };");
		assert_eq!(p.root().children[0].kind, TokenKind::Declaration);
	}

	#[test]
	fn designated_initialisers()
	{
		let p = parse_ok("int a[3] = { [0] = 1, [2] = 3, }; struct P p = { .x = 1, .y = { 2 } };");
		let list = p.root().children[0].find(TokenKind::InitializerList).unwrap();
		let kinds: Vec<_> = list.children.iter().map(|c| c.kind).collect();
		assert_eq!(kinds, [
			TokenKind::Designation, TokenKind::Initializer, TokenKind::Comma,
			TokenKind::Designation, TokenKind::Initializer, TokenKind::Comma,
			]);
		assert!(p.root().children[1].find(TokenKind::Designator).unwrap().child(TokenKind::Dot).is_some());
	}

	#[test]
	fn statements()
	{
		let p = parse_ok("void f(int n) {
			int i;
			for (i = 0; i < n; i++) { if (i) continue; else break; }
			for (int j = 0; ; ) ;
			do i--; while (i);
			switch (n) { case 1: goto out; default: ; }
			out: return;
		}");
		let body = p.root().find(TokenKind::BlockItemList).unwrap();
		let kinds: Vec<_> = body.children.iter().map(|c| c.kind).collect();
		assert_eq!(kinds, [
			TokenKind::Declaration,
			TokenKind::IterationStatement,
			TokenKind::IterationStatement,
			TokenKind::IterationStatement,
			TokenKind::SelectionStatement,
			TokenKind::LabeledStatement,
			]);
		assert_eq!(body.children[2].children[2].kind, TokenKind::Declaration);
	}

	#[test]
	fn typedef_name_as_variable()
	{
		let p = parse_ok("typedef int T; void f(void) { T x; int T; T = 1; }");
		let body = p.root().find(TokenKind::BlockItemList).unwrap();
		assert_eq!(body.children[0].kind, TokenKind::Declaration);
		assert_eq!(body.children[1].kind, TokenKind::Declaration);
		assert_eq!(body.children[2].kind, TokenKind::ExpressionStatement);
	}

	#[test]
	fn stray_tokens_are_skipped()
	{
		let p = Parser::from_source("t.c", "} int x; void f(void) { ) ; }");
		let d = p.diagnostics().entries();
		assert_eq!(d.len(), 2, "{}", p.diagnostics());
		assert_eq!(d[0].message, "unexpected '}'");
		assert_eq!(d[1].message, "unexpected ')'");
		assert_eq!(p.root().children.len(), 2);
	}

	#[test]
	fn static_assert()
	{
		let p = parse_ok("_Static_assert(sizeof(int) == 4, \"int\"); _Static_assert(1);");
		assert_eq!(p.root().children[0].kind, TokenKind::StaticAssertDeclaration);
		assert_eq!(p.root().children[1].kind, TokenKind::StaticAssertDeclaration);
	}
}
