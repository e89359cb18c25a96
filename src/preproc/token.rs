//! Token model: token kinds, display tags and the classification tables

/// Declares `TokenKind` along with its upper-snake display tag
macro_rules! token_kinds {
	( $( $(#[$attr:meta])* $variant:ident = $name:expr, )* ) => {
		/// Token type (result of lexing), also used to tag non-terminal tree nodes
		#[derive(Debug,PartialEq,Eq,Clone,Copy,Hash,PartialOrd,Ord)]
		pub enum TokenKind
		{
			$( $(#[$attr])* $variant, )*
		}
		impl TokenKind
		{
			/// Tag used when dumping tokens and trees
			pub fn name(&self) -> &'static str
			{
				match *self
				{
				$( TokenKind::$variant => $name, )*
				}
			}
		}
	};
}

token_kinds! {
	// -- Operators
	Plus = "PLUS",
	Minus = "MINUS",
	Mul = "MUL",
	Div = "DIV",
	Mod = "MOD",
	Reference = "REFERENCE",
	Lt = "LT",
	Gt = "GT",
	Lte = "LTE",
	Gte = "GTE",
	Assign = "ASSIGN",
	Eq = "EQ",
	Unequal = "UNEQUAL",
	Not = "NOT",
	And = "AND",
	Or = "OR",
	BitOr = "BIT_OR",
	Xor = "XOR",
	Question = "QUESTION",
	Arrow = "ARROW",
	Dot = "DOT",
	Inc = "INC",
	Dec = "DEC",
	Tilde = "TILDE",
	MulAssign = "MUL_ASSIGN",
	DivAssign = "DIV_ASSIGN",
	ModAssign = "MOD_ASSIGN",
	AddAssign = "ADD_ASSIGN",
	SubAssign = "SUB_ASSIGN",
	LeftAssign = "LEFT_ASSIGN",
	RightAssign = "RIGHT_ASSIGN",
	OrAssign = "OR_ASSIGN",
	AndAssign = "AND_ASSIGN",
	XorAssign = "XOR_ASSIGN",
	LeftShift = "LEFT_SHIFT",
	RightShift = "RIGHT_SHIFT",

	// -- Leaves
	Id = "ID",
	Constant = "CONSTANT",
	StringLiteral = "STRING_LITERAL",

	// -- Reserved words
	Auto = "AUTO",
	Register = "REGISTER",
	Enum = "ENUM",
	Signed = "SIGNED",
	Do = "DO",
	While = "WHILE",
	For = "FOR",
	Break = "BRK",
	Continue = "CONT",
	Switch = "SWITCH",
	Case = "CASE",
	Default = "DEFAULT",
	If = "IF",
	Else = "ELSE",
	Goto = "GOTO",
	Int = "INT_TYPE",
	Float = "FLOAT_TYPE",
	Long = "LONG_TYPE",
	Short = "SHORT_TYPE",
	Char = "CHAR_TYPE",
	Double = "DOUBLE_TYPE",
	Void = "VOID",
	Return = "RETURN",
	Sizeof = "SIZEOF",
	Struct = "STRUCT",
	Union = "UNION",
	Typedef = "TYPEDEF",
	Static = "STATIC",
	Volatile = "VOLATILE",
	Const = "CONST",
	Unsigned = "UNSIGNED",
	Extern = "EXTERN",
	Inline = "INLINE",
	Restrict = "RESTRICT",
	// - C11
	Bool = "BOOL_TYPE",
	Complex = "COMPLEX",
	Imaginary = "IMAGINARY",
	Atomic = "ATOMIC",
	Alignas = "ALIGNAS",
	Alignof = "ALIGNOF",
	Generic = "GENERIC",
	StaticAssert = "STATIC_ASSERT",
	Noreturn = "NORETURN",
	ThreadLocal = "THREAD_LOCAL",

	// -- Directives
	Include = "INCLUDE",
	Ifdef = "IFDEF",
	Ifndef = "IFNDEF",
	Endif = "ENDIF",
	Define = "DEFINE",
	Defined = "DEFINED",
	Undef = "UNDEF",
	IfDirective = "IF_DIRECTIVE",
	ElifDirective = "ELIF_DIRECTIVE",
	ElseDirective = "ELSE_DIRECTIVE",
	Pragma = "PRAGMA",
	IncludePath = "INCLUDE_PATH",

	// -- Symbols
	LCur = "L_CUR",
	RCur = "R_CUR",
	LSqr = "L_SQR",
	RSqr = "R_SQR",
	LBr = "L_BR",
	RBr = "R_BR",
	Comma = "COMMA",
	Colon = "COLON",
	SemiColon = "SEMI_COLON",
	DoubleQuote = "DOUBLE_QUOTE",
	SingleQuote = "SINGLE_QUOTE",
	Ellipsis = "ELLIPSIS",
	/// `#` as seen by the raw scanner, never leaves the preprocessor
	Hash = "HASH",

	End = "END",

	// -- Non-terminals (one per grammar rule)
	TranslationUnit = "TRANSLATION_UNIT",
	IncludeStmt = "INCLUDE_STMT",
	FunctionDefinition = "FUNCTION_DEFINITION",
	DeclarationList = "DECLARATION_LIST",
	Declaration = "DECLARATION",
	DeclarationSpecifiers = "DECLARATION_SPECIFIERS",
	InitDeclaratorList = "INIT_DECLARATOR_LIST",
	InitDeclarator = "INIT_DECLARATOR",
	Declarator = "DECLARATOR",
	DirectDeclarator = "DIRECT_DECLARATOR",
	Pointer = "POINTER",
	TypeQualifierList = "TYPE_QUALIFIER_LIST",
	ParameterTypeList = "PARAMETER_TYPE_LIST",
	ParameterList = "PARAMETER_LIST",
	ParameterDeclaration = "PARAMETER_DECLARATION",
	IdentifierList = "IDENTIFIER_LIST",
	AbstractDeclarator = "ABSTRACT_DECLARATOR",
	DirectAbstractDeclarator = "DIRECT_ABSTRACT_DECLARATOR",
	TypeName = "TYPE_NAME",
	SpecifierQualifierList = "SPECIFIER_QUALIFIER_LIST",
	StructUnionSpecifier = "STRUCT_UNION_SPECIFIER",
	StructDeclarationList = "STRUCT_DECLARATION_LIST",
	StructDeclaration = "STRUCT_DECLARATION",
	StructDeclaratorList = "STRUCT_DECLARATOR_LIST",
	StructDeclarator = "STRUCT_DECLARATOR",
	EnumSpecifier = "ENUM_SPECIFIER",
	EnumeratorList = "ENUMERATOR_LIST",
	Enumerator = "ENUMERATOR",
	Initializer = "INITIALIZER",
	InitializerList = "INITIALIZER_LIST",
	Designation = "DESIGNATION",
	DesignatorList = "DESIGNATOR_LIST",
	Designator = "DESIGNATOR",
	GenericSelection = "GENERIC_SELECTION",
	GenericAssocList = "GENERIC_ASSOC_LIST",
	GenericAssociation = "GENERIC_ASSOCIATION",
	StaticAssertDeclaration = "STATIC_ASSERT_DECLARATION",
	AlignmentSpecifier = "ALIGNMENT_SPECIFIER",
	AtomicTypeSpecifier = "ATOMIC_TYPE_SPECIFIER",
	CompoundStatement = "COMPOUND_STATEMENT",
	BlockItemList = "BLOCK_ITEM_LIST",
	LabeledStatement = "LABELED_STATEMENT",
	ExpressionStatement = "EXPRESSION_STATEMENT",
	SelectionStatement = "SELECTION_STATEMENT",
	IterationStatement = "ITERATION_STATEMENT",
	JumpStatement = "JUMP_STATEMENT",
	Expression = "EXPRESSION",
	AssignmentExp = "ASSIGNMENT_EXP",
	ConditionalExp = "CONDITIONAL_EXP",
	LogicalOrExp = "LOGICAL_OR_EXP",
	LogicalAndExp = "LOGICAL_AND_EXP",
	InclusiveOrExp = "INCLUSIVE_OR_EXP",
	ExclusiveOrExp = "EXCLUSIVE_OR_EXP",
	AndExp = "AND_EXP",
	EqualityExp = "EQUALITY_EXP",
	RelationalExp = "RELATIONAL_EXP",
	ShiftExp = "SHIFT_EXP",
	AdditiveExp = "ADDITIVE_EXP",
	MultiplicativeExp = "MULTIPLICATIVE_EXP",
	CastExp = "CAST_EXP",
	UnaryExp = "UNARY_EXP",
	PostfixExp = "POSTFIX_EXP",
	PrimaryExp = "PRIMARY_EXP",
	ArgumentExpList = "ARGUMENT_EXP_LIST",
}

impl ::std::fmt::Display for TokenKind
{
	fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result
	{
		f.write_str(self.name())
	}
}

impl TokenKind
{
	/// Reserved words (C89 through C11)
	pub fn is_keyword(&self) -> bool
	{
		use self::TokenKind::*;
		match *self
		{
		Auto | Register | Enum | Signed | Do | While | For | Break | Continue
		| Switch | Case | Default | If | Else | Goto | Int | Float | Long | Short
		| Char | Double | Void | Return | Sizeof | Struct | Union | Typedef
		| Static | Volatile | Const | Unsigned | Extern | Inline | Restrict
		| Bool | Complex | Imaginary | Atomic | Alignas | Alignof | Generic
		| StaticAssert | Noreturn | ThreadLocal
			=> true,
		_ => false,
		}
	}

	/// Type-specifier keywords (typedef names are resolved by the parser)
	pub fn is_type_specifier(&self) -> bool
	{
		use self::TokenKind::*;
		match *self
		{
		Void | Char | Short | Int | Long | Float | Double | Signed | Unsigned
		| Bool | Complex | Imaginary | Struct | Union | Enum | Atomic
			=> true,
		_ => false,
		}
	}

	pub fn is_type_qualifier(&self) -> bool
	{
		match *self
		{
		TokenKind::Const | TokenKind::Restrict | TokenKind::Volatile | TokenKind::Atomic => true,
		_ => false,
		}
	}

	pub fn is_storage_class(&self) -> bool
	{
		use self::TokenKind::*;
		match *self
		{
		Typedef | Extern | Static | ThreadLocal | Auto | Register => true,
		_ => false,
		}
	}

	pub fn is_function_specifier(&self) -> bool
	{
		*self == TokenKind::Inline || *self == TokenKind::Noreturn
	}

	pub fn is_assignment_operator(&self) -> bool
	{
		use self::TokenKind::*;
		match *self
		{
		Assign | MulAssign | DivAssign | ModAssign | AddAssign | SubAssign
		| LeftAssign | RightAssign | AndAssign | XorAssign | OrAssign
			=> true,
		_ => false,
		}
	}

	pub fn is_operator(&self) -> bool
	{
		use self::TokenKind::*;
		match *self
		{
		Plus | Minus | Mul | Div | Mod | Reference | Lt | Gt | Lte | Gte | Eq
		| Unequal | Not | And | Or | BitOr | Xor | Question | Arrow | Dot | Inc
		| Dec | Tilde | LeftShift | RightShift
			=> true,
		k => k.is_assignment_operator(),
		}
	}

	pub fn is_symbol(&self) -> bool
	{
		use self::TokenKind::*;
		match *self
		{
		LCur | RCur | LSqr | RSqr | LBr | RBr | Comma | Colon | SemiColon
		| DoubleQuote | SingleQuote | Ellipsis
			=> true,
		_ => false,
		}
	}

	pub fn is_directive(&self) -> bool
	{
		use self::TokenKind::*;
		match *self
		{
		Include | Ifdef | Ifndef | Endif | Define | Defined | Undef | IfDirective
		| ElifDirective | ElseDirective | Pragma
			=> true,
		_ => false,
		}
	}

	/// Tags that only ever label interior tree nodes
	pub fn is_nonterminal(&self) -> bool
	{
		*self > TokenKind::End
	}
}

/// A single lexed token
#[derive(Debug,PartialEq,Eq,Clone)]
pub struct Token
{
	pub kind: TokenKind,
	/// Surface spelling for punctuation, decoded text for literals
	pub lexeme: String,
	pub line: usize,
}

impl Token
{
	pub fn new<S: Into<String>>(kind: TokenKind, lexeme: S, line: usize) -> Token
	{
		Token {
			kind: kind,
			lexeme: lexeme.into(),
			line: line,
			}
	}

	pub fn is_end(&self) -> bool
	{
		self.kind == TokenKind::End
	}
}

impl ::std::fmt::Display for Token
{
	fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result
	{
		if self.lexeme.is_empty() {
			write!(f, "{}", self.kind)
		}
		else {
			write!(f, "{}({:?})", self.kind, self.lexeme)
		}
	}
}

/// Look up a reserved word
pub fn keyword(word: &str) -> Option<TokenKind>
{
	use self::TokenKind::*;
	Some(match word
	{
	"auto" => Auto,
	"break" => Break,
	"case" => Case,
	"char" => Char,
	"const" => Const,
	"continue" => Continue,
	"default" => Default,
	"do" => Do,
	"double" => Double,
	"else" => Else,
	"enum" => Enum,
	"extern" => Extern,
	"float" => Float,
	"for" => For,
	"goto" => Goto,
	"if" => If,
	"inline" => Inline,
	"int" => Int,
	"long" => Long,
	"register" => Register,
	"restrict" => Restrict,
	"return" => Return,
	"short" => Short,
	"signed" => Signed,
	"sizeof" => Sizeof,
	"static" => Static,
	"struct" => Struct,
	"switch" => Switch,
	"typedef" => Typedef,
	"union" => Union,
	"unsigned" => Unsigned,
	"void" => Void,
	"volatile" => Volatile,
	"while" => While,
	"_Alignas" => Alignas,
	"_Alignof" => Alignof,
	"_Atomic" => Atomic,
	"_Bool" => Bool,
	"_Complex" => Complex,
	"_Generic" => Generic,
	"_Imaginary" => Imaginary,
	"_Noreturn" => Noreturn,
	"_Static_assert" => StaticAssert,
	"_Thread_local" => ThreadLocal,
	_ => return None,
	})
}

/// Look up a preprocessor directive name (the word after `#`)
pub fn directive(word: &str) -> Option<TokenKind>
{
	use self::TokenKind::*;
	Some(match word
	{
	"include" => Include,
	"ifdef" => Ifdef,
	"ifndef" => Ifndef,
	"endif" => Endif,
	"define" => Define,
	"defined" => Defined,
	"undef" => Undef,
	"if" => IfDirective,
	"elif" => ElifDirective,
	"else" => ElseDirective,
	"pragma" => Pragma,
	_ => return None,
	})
}

/// Look up a (one to three character) operator spelling
pub fn operator(s: &str) -> Option<TokenKind>
{
	use self::TokenKind::*;
	Some(match s
	{
	"+" => Plus,
	"-" => Minus,
	"*" => Mul,
	"/" => Div,
	"%" => Mod,
	"&" => Reference,
	"<" => Lt,
	">" => Gt,
	"!" => Not,
	"=" => Assign,
	"|" => BitOr,
	"^" => Xor,
	"~" => Tilde,
	"?" => Question,
	"." => Dot,
	"<=" => Lte,
	">=" => Gte,
	"==" => Eq,
	"!=" => Unequal,
	"+=" => AddAssign,
	"-=" => SubAssign,
	"*=" => MulAssign,
	"/=" => DivAssign,
	"%=" => ModAssign,
	"&=" => AndAssign,
	"|=" => OrAssign,
	"^=" => XorAssign,
	"<<" => LeftShift,
	">>" => RightShift,
	"<<=" => LeftAssign,
	">>=" => RightAssign,
	"&&" => And,
	"||" => Or,
	"->" => Arrow,
	"++" => Inc,
	"--" => Dec,
	_ => return None,
	})
}

/// Characters that start an operator token
pub fn begins_operator(ch: char) -> bool
{
	match ch
	{
	'*' | '+' | '%' | '-' | '/' | '<' | '>' | '!' | '&' | '=' | '|' | '^' | '~' | '?' => true,
	_ => false,
	}
}

/// Single-character punctuation
pub fn symbol(ch: char) -> Option<TokenKind>
{
	use self::TokenKind::*;
	Some(match ch
	{
	'{' => LCur,
	'}' => RCur,
	'[' => LSqr,
	']' => RSqr,
	'(' => LBr,
	')' => RBr,
	',' => Comma,
	':' => Colon,
	';' => SemiColon,
	'"' => DoubleQuote,
	'\'' => SingleQuote,
	_ => return None,
	})
}
