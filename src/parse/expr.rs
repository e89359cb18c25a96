//! Expression parsing
//!
//! Each precedence level only creates its node when one of its operators is present, otherwise the node from
//! the next tighter level is passed straight up.
use crate::ast::Node;
use crate::preproc::TokenKind;

// Parse, left associative
macro_rules! parse_left_assoc
{
	($_self:ident, $name:ident, $next:ident, $tag:ident, [ $($op:ident),+ ]) => {
		fn $name(&mut $_self) -> Node {
			let mut rv = $_self.$next();
			while peek_token!($_self, $($op)|+)
			{
				let mut node = Node::new(TokenKind::$tag);
				node.push(rv);
				$_self.take_into(&mut node);
				let rhs = $_self.$next();
				node.push(rhs);
				rv = node;
			}
			rv
		}
	}
}

impl super::ParseState
{
	/// Comma-separated sequence of assignment expressions
	pub(super) fn expression(&mut self) -> Node
	{
		let first = self.assignment_expression();
		if !self.matches(TokenKind::Comma) {
			return first;
		}
		let mut node = Node::new(TokenKind::Expression);
		node.push(first);
		while self.eat_into(&mut node, TokenKind::Comma)
		{
			let e = self.assignment_expression();
			node.push(e);
		}
		node
	}

	/// Right associative
	pub(super) fn assignment_expression(&mut self) -> Node
	{
		let lhs = self.conditional_expression();
		if !self.peek_kind().is_assignment_operator() {
			return lhs;
		}
		let mut node = Node::new(TokenKind::AssignmentExp);
		node.push(lhs);
		self.take_into(&mut node);
		let rhs = self.assignment_expression();
		node.push(rhs);
		node
	}

	/// `cond ? expression : conditional`
	pub(super) fn conditional_expression(&mut self) -> Node
	{
		let cond = self.logical_or_expression();
		if !self.matches(TokenKind::Question) {
			return cond;
		}
		let mut node = Node::new(TokenKind::ConditionalExp);
		node.push(cond);
		self.take_into(&mut node);
		let tv = self.expression();
		node.push(tv);
		self.expect_into(&mut node, TokenKind::Colon, "':'");
		let fv = self.conditional_expression();
		node.push(fv);
		node
	}

	parse_left_assoc!{self, logical_or_expression, logical_and_expression, LogicalOrExp, [Or]}
	parse_left_assoc!{self, logical_and_expression, inclusive_or_expression, LogicalAndExp, [And]}
	parse_left_assoc!{self, inclusive_or_expression, exclusive_or_expression, InclusiveOrExp, [BitOr]}
	parse_left_assoc!{self, exclusive_or_expression, and_expression, ExclusiveOrExp, [Xor]}
	parse_left_assoc!{self, and_expression, equality_expression, AndExp, [Reference]}
	parse_left_assoc!{self, equality_expression, relational_expression, EqualityExp, [Eq, Unequal]}
	parse_left_assoc!{self, relational_expression, shift_expression, RelationalExp, [Lt, Gt, Lte, Gte]}
	parse_left_assoc!{self, shift_expression, additive_expression, ShiftExp, [LeftShift, RightShift]}
	parse_left_assoc!{self, additive_expression, multiplicative_expression, AdditiveExp, [Plus, Minus]}
	parse_left_assoc!{self, multiplicative_expression, cast_expression, MultiplicativeExp, [Mul, Div, Mod]}

	/// `( type-name ) cast-expression`, falling back to a unary expression
	fn cast_expression(&mut self) -> Node
	{
		if self.matches(TokenKind::LBr)
		{
			let tok = self.lex.peek_nth(1);
			if self.starts_type_name(&tok)
			{
				if let Some(n) = self.speculate(|s| s.try_cast()) {
					debug!("cast_expression: cast at line {}", tok.line);
					return n;
				}
				debug!("cast_expression: not a cast at line {}", tok.line);
			}
		}
		self.unary_expression()
	}

	fn try_cast(&mut self) -> Option<Node>
	{
		let errors = self.grammar_error_count();
		let mut node = Node::new(TokenKind::CastExp);
		self.take_into(&mut node);
		let t = self.type_name();
		node.push(t);
		if self.grammar_error_count() != errors || !self.eat_into(&mut node, TokenKind::RBr) {
			return None;
		}
		// `( type-name ) {` is a compound literal
		if self.matches(TokenKind::LCur) {
			return None;
		}
		let e = self.cast_expression();
		node.push(e);
		Some(node)
	}

	fn unary_expression(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::UnaryExp);
		match self.peek_kind()
		{
		TokenKind::Inc | TokenKind::Dec => {
			self.take_into(&mut node);
			let e = self.unary_expression();
			node.push(e);
			},
		TokenKind::Reference | TokenKind::Mul | TokenKind::Plus | TokenKind::Minus | TokenKind::Tilde | TokenKind::Not => {
			self.take_into(&mut node);
			let e = self.cast_expression();
			node.push(e);
			},
		TokenKind::Sizeof => {
			self.take_into(&mut node);
			let next = self.lex.peek_nth(1);
			if self.matches(TokenKind::LBr) && self.starts_type_name(&next) {
				self.take_into(&mut node);
				let t = self.type_name();
				node.push(t);
				self.expect_into(&mut node, TokenKind::RBr, "')'");
			}
			else {
				let e = self.unary_expression();
				node.push(e);
			}
			},
		TokenKind::Alignof => {
			self.take_into(&mut node);
			if self.eat_into(&mut node, TokenKind::LBr) {
				let t = self.type_name();
				node.push(t);
				self.expect_into(&mut node, TokenKind::RBr, "')'");
			}
			else {
				self.error("expected '(' after _Alignof");
				let e = self.unary_expression();
				node.push(e);
			}
			},
		_ => return self.postfix_expression(),
		}
		node
	}

	fn postfix_expression(&mut self) -> Node
	{
		let mut rv = None;
		if self.matches(TokenKind::LBr) {
			let tok = self.lex.peek_nth(1);
			if self.starts_type_name(&tok) {
				rv = self.speculate(|s| s.compound_literal());
			}
		}
		let mut rv = match rv
			{
			Some(n) => n,
			None => self.primary_expression(),
			};

		loop
		{
			let mut node = Node::new(TokenKind::PostfixExp);
			match self.peek_kind()
			{
			TokenKind::LSqr => {
				node.push(rv);
				self.take_into(&mut node);
				let e = self.expression();
				node.push(e);
				self.expect_into(&mut node, TokenKind::RSqr, "']'");
				},
			TokenKind::LBr => {
				node.push(rv);
				self.take_into(&mut node);
				if !self.matches(TokenKind::RBr) {
					let args = self.argument_expression_list();
					node.push(args);
				}
				self.expect_into(&mut node, TokenKind::RBr, "')'");
				},
			TokenKind::Dot | TokenKind::Arrow => {
				node.push(rv);
				self.take_into(&mut node);
				self.expect_into(&mut node, TokenKind::Id, "member name");
				},
			TokenKind::Inc | TokenKind::Dec => {
				node.push(rv);
				self.take_into(&mut node);
				},
			_ => break,
			}
			rv = node;
		}
		rv
	}

	/// `( type-name ) { initializer-list }`
	fn compound_literal(&mut self) -> Option<Node>
	{
		let errors = self.grammar_error_count();
		let mut node = Node::new(TokenKind::PostfixExp);
		self.take_into(&mut node);
		let t = self.type_name();
		node.push(t);
		if self.grammar_error_count() != errors || !self.eat_into(&mut node, TokenKind::RBr) {
			return None;
		}
		if !self.eat_into(&mut node, TokenKind::LCur) {
			return None;
		}
		if !self.matches(TokenKind::RCur) {
			let l = self.initializer_list();
			node.push(l);
		}
		self.expect_into(&mut node, TokenKind::RCur, "'}'");
		Some(node)
	}

	fn argument_expression_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::ArgumentExpList);
		loop
		{
			let e = self.assignment_expression();
			node.push(e);
			if !self.eat_into(&mut node, TokenKind::Comma) {
				break;
			}
		}
		node
	}

	fn primary_expression(&mut self) -> Node
	{
		let tok = self.lex.peek_token();
		match tok.kind
		{
		TokenKind::Id | TokenKind::Constant => Node::leaf(self.lex.get_token()),
		TokenKind::StringLiteral => {
			let first = Node::leaf(self.lex.get_token());
			if !self.matches(TokenKind::StringLiteral) {
				return first;
			}
			// Adjacent literals
			let mut node = Node::new(TokenKind::PrimaryExp);
			node.push(first);
			while self.eat_into(&mut node, TokenKind::StringLiteral)
			{
			}
			node
			},
		TokenKind::LBr => {
			let mut node = Node::new(TokenKind::PrimaryExp);
			self.take_into(&mut node);
			let e = self.expression();
			node.push(e);
			self.expect_into(&mut node, TokenKind::RBr, "')'");
			node
			},
		TokenKind::Generic => self.generic_selection(),
		_ => {
			self.error(format!("expected expression before {}", super::describe(&tok)));
			Node::new(TokenKind::PrimaryExp)
			},
		}
	}

	/// `_Generic ( assignment-expression , generic-assoc-list )`
	fn generic_selection(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::GenericSelection);
		self.take_into(&mut node);
		self.expect_into(&mut node, TokenKind::LBr, "'('");
		let e = self.assignment_expression();
		node.push(e);
		self.expect_into(&mut node, TokenKind::Comma, "','");
		let l = self.generic_assoc_list();
		node.push(l);
		self.expect_into(&mut node, TokenKind::RBr, "')'");
		node
	}

	fn generic_assoc_list(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::GenericAssocList);
		loop
		{
			let a = self.generic_association();
			node.push(a);
			if !self.eat_into(&mut node, TokenKind::Comma) {
				break;
			}
		}
		node
	}

	/// `type-name : expr` or `default : expr`
	fn generic_association(&mut self) -> Node
	{
		let mut node = Node::new(TokenKind::GenericAssociation);
		if !self.eat_into(&mut node, TokenKind::Default) {
			let t = self.type_name();
			node.push(t);
		}
		self.expect_into(&mut node, TokenKind::Colon, "':'");
		let e = self.assignment_expression();
		node.push(e);
		node
	}
}

#[cfg(test)]
mod tests
{
	use crate::ast::Node;
	use crate::parse::Parser;
	use crate::preproc::TokenKind;

	/// Parse `void f(void) { <src>; }` and return the statement's expression
	fn expr(src: &str) -> Node
	{
		let p = Parser::from_source("t.c", &format!("typedef int T; void f(void) {{ {}; }}", src));
		assert!(p.diagnostics().is_empty(), "{}", p.diagnostics());
		let stmt = p.root().find(TokenKind::ExpressionStatement).unwrap();
		stmt.children[0].clone()
	}

	#[test]
	fn levels_collapse()
	{
		let e = expr("x");
		assert_eq!(e.kind, TokenKind::Id);
		let e = expr("a || b && c | d ^ e & f");
		assert_eq!(e.kind, TokenKind::LogicalOrExp);
		assert_eq!(e.children[2].kind, TokenKind::LogicalAndExp);
		let rhs = &e.children[2].children[2];
		assert_eq!(rhs.kind, TokenKind::InclusiveOrExp);
		assert_eq!(rhs.children[2].kind, TokenKind::ExclusiveOrExp);
		assert_eq!(rhs.children[2].children[2].kind, TokenKind::AndExp);
	}

	#[test]
	fn left_nesting()
	{
		let e = expr("a - b - c");
		assert_eq!(e.kind, TokenKind::AdditiveExp);
		assert_eq!(e.children[0].kind, TokenKind::AdditiveExp);
		assert_eq!(e.children[0].text(), "a - b");
		assert_eq!(e.children[2].lexeme, "c");
	}

	#[test]
	fn assignment_is_right_associative()
	{
		let e = expr("a = b += c");
		assert_eq!(e.kind, TokenKind::AssignmentExp);
		assert_eq!(e.children[2].kind, TokenKind::AssignmentExp);
		assert_eq!(e.children[2].children[1].kind, TokenKind::AddAssign);
	}

	#[test]
	fn casts_and_parens()
	{
		let e = expr("(T)x + (y)");
		assert_eq!(e.children[0].kind, TokenKind::CastExp);
		assert_eq!(e.children[2].kind, TokenKind::PrimaryExp);

		let e = expr("(unsigned long)(char)-1");
		assert_eq!(e.kind, TokenKind::CastExp);
		assert_eq!(e.children[3].kind, TokenKind::CastExp);
		assert_eq!(e.children[3].children[3].kind, TokenKind::UnaryExp);
	}

	#[test]
	fn compound_literal()
	{
		let e = expr("(struct P){ .x = 1 }.x");
		assert_eq!(e.kind, TokenKind::PostfixExp);
		assert_eq!(e.children[0].kind, TokenKind::PostfixExp);
		assert!(e.children[0].contains(TokenKind::InitializerList));
	}

	#[test]
	fn postfix_chain()
	{
		let e = expr("p->q[1].r(a, b)++");
		assert_eq!(e.kind, TokenKind::PostfixExp);
		assert_eq!(e.children[1].kind, TokenKind::Inc);
		let call = &e.children[0];
		assert_eq!(call.child(TokenKind::ArgumentExpList).map(|a| a.children.len()), Some(3));
	}

	#[test]
	fn sizeof_and_alignof()
	{
		let e = expr("sizeof(T) + sizeof x + _Alignof(int)");
		assert!(e.children[0].children[0].contains(TokenKind::TypeName));
		assert!(!e.children[0].children[2].contains(TokenKind::TypeName));
		assert!(e.children[2].contains(TokenKind::TypeName));

		let p = Parser::from_source("t.c", "int a = _Alignof x;");
		assert_eq!(p.diagnostics().grammar_count(), 1);
	}

	#[test]
	fn generic_selection()
	{
		let e = expr("_Generic(x, int: 1, char *: 2, default: 3)");
		assert_eq!(e.kind, TokenKind::GenericSelection);
		let assocs = e.child(TokenKind::GenericAssocList).unwrap();
		assert_eq!(assocs.children.iter().filter(|c| c.kind == TokenKind::GenericAssociation).count(), 3);
	}

	#[test]
	fn adjacent_strings()
	{
		let e = expr("\"ab\" \"cd\"");
		assert_eq!(e.kind, TokenKind::PrimaryExp);
		assert_eq!(e.text(), "ab cd");
	}

	#[test]
	fn missing_operand()
	{
		let p = Parser::from_source("t.c", "int a = 1 + ;");
		let d = p.diagnostics().entries();
		assert_eq!(d.len(), 1);
		assert_eq!(d[0].message, "expected expression before ';'");
	}
}
