//! Parser for types: specifiers, declarators, struct/union/enum bodies, parameters and type names
use crate::ast::Node;
use crate::preproc::TokenKind;

/// Name introduced by a DECLARATOR, looking through parenthesised inner declarators
pub(super) fn declarator_name(decl: &Node) -> Option<&str>
{
	let dd = decl.child(TokenKind::DirectDeclarator)?;
	match dd.children.first()
	{
	Some(n) if n.kind == TokenKind::Id => Some(&n.lexeme),
	Some(n) if n.kind == TokenKind::LBr => dd.child(TokenKind::Declarator).and_then(declarator_name),
	_ => None,
	}
}

impl super::ParseState
{
	pub(super) fn declaration_specifiers(&mut self) -> Node
	{
		self.specifiers(TokenKind::DeclarationSpecifiers, true)
	}

	pub(super) fn specifier_qualifier_list(&mut self) -> Node
	{
		self.specifiers(TokenKind::SpecifierQualifierList, false)
	}

	/// Read specifiers/qualifiers until something else turns up.
	/// - A typedef name only counts while no other type specifier has been seen.
	fn specifiers(&mut self, tag: TokenKind, allow_storage: bool) -> Node
	{
		let mut node = Node::new(tag);
		let mut seen_type = false;
		loop
		{
			let tok = self.lex.peek_token();
			match tok.kind
			{
			// `_Atomic ( type-name )` is a specifier, bare `_Atomic` a qualifier
			TokenKind::Atomic => {
				if self.peek_kind_nth(1) == TokenKind::LBr {
					let a = self.atomic_type_specifier();
					node.push(a);
					seen_type = true;
				}
				else {
					self.take_into(&mut node);
				}
				},
			TokenKind::Struct | TokenKind::Union => {
				let s = self.struct_or_union_specifier();
				node.push(s);
				seen_type = true;
				},
			TokenKind::Enum => {
				let e = self.enum_specifier();
				node.push(e);
				seen_type = true;
				},
			TokenKind::Alignas => {
				let a = self.alignment_specifier();
				node.push(a);
				},
			k if k.is_type_specifier() => {
				self.take_into(&mut node);
				seen_type = true;
				},
			k if k.is_type_qualifier() => {
				self.take_into(&mut node);
				},
			k if allow_storage && (k.is_storage_class() || k.is_function_specifier()) => {
				self.take_into(&mut node);
				},
			TokenKind::Id if !seen_type && self.is_typedef_name(&tok.lexeme) => {
				trace!("specifiers: typedef name {}", tok.lexeme);
				self.take_into(&mut node);
				seen_type = true;
				},
			_ => break,
			}
		}
		node
	}

	fn struct_or_union_specifier(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::StructUnionSpecifier);
		self.take_into(&mut node);
		let has_tag = self.eat_into(&mut node, TokenKind::Id);
		if self.eat_into(&mut node, TokenKind::LCur)
		{
			if !self.matches(TokenKind::RCur) {
				let list = self.struct_declaration_list();
				node.push(list);
			}
			self.expect_into(&mut node, TokenKind::RCur, "'}'");
		}
		else if !has_tag
		{
			self.error("expected identifier or '{' after struct/union");
		}
		node
	}

	fn struct_declaration_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::StructDeclarationList);
		while !peek_token!(self, RCur | End)
		{
			if let Some(d) = self.list_item(|s| s.struct_declaration()) {
				node.push(d);
			}
		}
		node
	}

	/// Member declaration. The declarator list is optional (anonymous struct/union members).
	fn struct_declaration(&mut self) -> Node
	{
		if self.matches(TokenKind::StaticAssert) {
			return self.static_assert_declaration();
		}
		let mut node = Node::new(TokenKind::StructDeclaration);
		let specs = self.specifier_qualifier_list();
		if specs.children.is_empty() {
			// Nothing here is a member, leave it to the caller
			return node;
		}
		node.push(specs);
		if !self.matches(TokenKind::SemiColon) {
			let list = self.struct_declarator_list();
			node.push(list);
		}
		self.expect_into(&mut node, TokenKind::SemiColon, "';'");
		node
	}

	fn struct_declarator_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::StructDeclaratorList);
		loop
		{
			let d = self.struct_declarator();
			node.push(d);
			if !self.eat_into(&mut node, TokenKind::Comma) {
				break;
			}
		}
		node
	}

	/// `declarator`, `declarator : width` or `: width`
	fn struct_declarator(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::StructDeclarator);
		if !self.matches(TokenKind::Colon) {
			let d = self.declarator();
			node.push(d);
		}
		if self.eat_into(&mut node, TokenKind::Colon) {
			let e = self.conditional_expression();
			node.push(e);
		}
		node
	}

	fn enum_specifier(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::EnumSpecifier);
		self.take_into(&mut node);
		let has_tag = self.eat_into(&mut node, TokenKind::Id);
		if self.eat_into(&mut node, TokenKind::LCur)
		{
			let list = self.enumerator_list();
			node.push(list);
			self.expect_into(&mut node, TokenKind::RCur, "'}'");
		}
		else if !has_tag
		{
			self.error("expected identifier or '{' after enum");
		}
		node
	}

	/// Enumerators, with an optional trailing comma
	fn enumerator_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::EnumeratorList);
		loop
		{
			if peek_token!(self, RCur | End) {
				break;
			}
			let e = self.enumerator();
			node.push(e);
			if !self.eat_into(&mut node, TokenKind::Comma) {
				break;
			}
		}
		node
	}

	fn enumerator(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::Enumerator);
		if self.expect_into(&mut node, TokenKind::Id, "enumerator name") {
			if self.eat_into(&mut node, TokenKind::Assign) {
				let e = self.conditional_expression();
				node.push(e);
			}
		}
		node
	}

	/// `_Atomic ( type-name )`
	fn atomic_type_specifier(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::AtomicTypeSpecifier);
		self.take_into(&mut node);
		self.expect_into(&mut node, TokenKind::LBr, "'('");
		let t = self.type_name();
		node.push(t);
		self.expect_into(&mut node, TokenKind::RBr, "')'");
		node
	}

	/// `_Alignas ( type-name )` or `_Alignas ( constant-expression )`
	fn alignment_specifier(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::AlignmentSpecifier);
		self.take_into(&mut node);
		self.expect_into(&mut node, TokenKind::LBr, "'('");
		let tok = self.lex.peek_token();
		let inner = if self.starts_type_name(&tok) {
				self.type_name()
			}
			else {
				self.conditional_expression()
			};
		node.push(inner);
		self.expect_into(&mut node, TokenKind::RBr, "')'");
		node
	}

	// ----------------------------------------------------------------
	// Declarators
	// ----------------------------------------------------------------
	pub(super) fn declarator(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::Declarator);
		if self.matches(TokenKind::Mul) {
			let p = self.pointer();
			node.push(p);
		}
		let d = self.direct_declarator();
		node.push(d);
		node
	}

	/// `* type-qualifier-list? pointer?`
	fn pointer(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::Pointer);
		self.take_into(&mut node);
		if self.peek_kind().is_type_qualifier() {
			let q = self.type_qualifier_list();
			node.push(q);
		}
		if self.matches(TokenKind::Mul) {
			let p = self.pointer();
			node.push(p);
		}
		node
	}

	fn type_qualifier_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::TypeQualifierList);
		while self.peek_kind().is_type_qualifier()
		{
			self.take_into(&mut node);
		}
		node
	}

	fn direct_declarator(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::DirectDeclarator);
		match self.peek_kind()
		{
		TokenKind::Id => self.take_into(&mut node),
		TokenKind::LBr => {
			self.take_into(&mut node);
			let d = self.declarator();
			node.push(d);
			self.expect_into(&mut node, TokenKind::RBr, "')'");
			},
		_ => {
			self.error("expected identifier or '('");
			return node;
			},
		}

		loop
		{
			match self.peek_kind()
			{
			TokenKind::LSqr => {
				self.take_into(&mut node);
				self.array_bound(&mut node);
				self.expect_into(&mut node, TokenKind::RSqr, "']'");
				},
			TokenKind::LBr => {
				self.take_into(&mut node);
				let tok = self.lex.peek_token();
				match tok.kind
				{
				TokenKind::RBr => {},
				TokenKind::Id if !self.is_typedef_name(&tok.lexeme) => {
					let l = self.identifier_list();
					node.push(l);
					},
				_ => {
					let l = self.parameter_type_list();
					node.push(l);
					},
				}
				self.expect_into(&mut node, TokenKind::RBr, "')'");
				},
			_ => break,
			}
		}
		node
	}

	/// Contents of `[ ]`: `static`/qualifier forms, `*` for a variable length array, or a size
	fn array_bound(&mut self, node: &mut Node)
	{
		if self.eat_into(node, TokenKind::Static)
		{
			if self.peek_kind().is_type_qualifier() {
				let q = self.type_qualifier_list();
				node.push(q);
			}
			let e = self.assignment_expression();
			node.push(e);
			return ;
		}
		if self.peek_kind().is_type_qualifier()
		{
			let q = self.type_qualifier_list();
			node.push(q);
			if self.eat_into(node, TokenKind::Static) {
				let e = self.assignment_expression();
				node.push(e);
				return ;
			}
		}
		if self.matches(TokenKind::Mul) && self.peek_kind_nth(1) == TokenKind::RSqr {
			self.take_into(node);
		}
		else if !self.matches(TokenKind::RSqr) {
			let e = self.assignment_expression();
			node.push(e);
		}
	}

	/// Old-style parameter names
	fn identifier_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::IdentifierList);
		loop
		{
			self.expect_into(&mut node, TokenKind::Id, "identifier");
			if !self.eat_into(&mut node, TokenKind::Comma) {
				break;
			}
		}
		node
	}

	pub(super) fn parameter_type_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::ParameterTypeList);
		let l = self.parameter_list();
		node.push(l);
		if self.eat_into(&mut node, TokenKind::Comma) {
			self.expect_into(&mut node, TokenKind::Ellipsis, "'...'");
		}
		node
	}

	fn parameter_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::ParameterList);
		loop
		{
			let p = self.parameter_declaration();
			node.push(p);
			// `, ...` belongs to the parameter type list
			if !self.matches(TokenKind::Comma) || self.peek_kind_nth(1) == TokenKind::Ellipsis {
				break;
			}
			self.take_into(&mut node);
		}
		node
	}

	fn parameter_declaration(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::ParameterDeclaration);
		let specs = self.declaration_specifiers();
		if specs.children.is_empty() {
			self.error("expected parameter type");
		}
		node.push(specs);
		if peek_token!(self, Comma | RBr) {
			return node;
		}
		if self.parameter_has_name() {
			let d = self.declarator();
			node.push(d);
		}
		else {
			let d = self.abstract_declarator();
			node.push(d);
		}
		node
	}

	/// Scan through pointers, qualifiers and grouping parentheses: an identifier means a named declarator,
	/// anything else an abstract one.
	fn parameter_has_name(&mut self) -> bool
	{
		let mut i = 0;
		loop
		{
			let tok = self.lex.peek_nth(i);
			match tok.kind
			{
			TokenKind::Mul => {},
			k if k.is_type_qualifier() => {},
			TokenKind::Id => return !self.is_typedef_name(&tok.lexeme),
			TokenKind::LBr => {
				// `(` opening a parameter list rather than a group
				let next = self.lex.peek_nth(i + 1);
				if next.kind == TokenKind::RBr || self.starts_declaration(&next) {
					return false;
				}
				},
			_ => return false,
			}
			i += 1;
		}
	}

	fn abstract_declarator(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::AbstractDeclarator);
		if self.matches(TokenKind::Mul) {
			let p = self.pointer();
			node.push(p);
		}
		if peek_token!(self, LBr | LSqr) {
			let d = self.direct_abstract_declarator();
			node.push(d);
		}
		node
	}

	fn direct_abstract_declarator(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::DirectAbstractDeclarator);
		if self.matches(TokenKind::LBr)
		{
			let next = self.lex.peek_nth(1);
			let is_group = next.kind != TokenKind::RBr && !self.starts_declaration(&next);
			if is_group {
				self.take_into(&mut node);
				let d = self.abstract_declarator();
				node.push(d);
				self.expect_into(&mut node, TokenKind::RBr, "')'");
			}
		}
		loop
		{
			match self.peek_kind()
			{
			TokenKind::LSqr => {
				self.take_into(&mut node);
				self.array_bound(&mut node);
				self.expect_into(&mut node, TokenKind::RSqr, "']'");
				},
			TokenKind::LBr => {
				self.take_into(&mut node);
				if !self.matches(TokenKind::RBr) {
					let l = self.parameter_type_list();
					node.push(l);
				}
				self.expect_into(&mut node, TokenKind::RBr, "')'");
				},
			_ => break,
			}
		}
		node
	}

	/// `specifier-qualifier-list abstract-declarator?`
	pub(super) fn type_name(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::TypeName);
		let specs = self.specifier_qualifier_list();
		if specs.children.is_empty() {
			self.error("expected type name");
		}
		node.push(specs);
		if peek_token!(self, Mul | LBr | LSqr) {
			let d = self.abstract_declarator();
			node.push(d);
		}
		node
	}
}
