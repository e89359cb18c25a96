//! Tree dump, one line per node with box-drawing depth prefixes
use super::Node;
use std::fmt;
use std::io;

pub fn write(mut sink: impl io::Write, root: &Node) -> io::Result<()>
{
	write!(sink, "{}", Tree(root))
}

/// Render into a string
pub fn to_string(root: &Node) -> String
{
	Tree(root).to_string()
}

/// `Display` adapter for a whole tree
pub struct Tree<'a>(pub &'a Node);

impl<'a> fmt::Display for Tree<'a>
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
	{
		TreePrinter { sink: f }.write_tree(self.0)
	}
}

struct TreePrinter<'a, 'b: 'a>
{
	sink: &'a mut fmt::Formatter<'b>,
}

impl<'a, 'b> TreePrinter<'a, 'b>
{
	fn write_tree(&mut self, root: &Node) -> fmt::Result
	{
		self.write_node(root)?;
		let mut prefix = String::new();
		self.write_children(root, &mut prefix)
	}

	fn write_node(&mut self, node: &Node) -> fmt::Result
	{
		writeln!(self.sink, "Token: {} lexeme: {}", node.kind, node.lexeme)
	}

	fn write_children(&mut self, node: &Node, prefix: &mut String) -> fmt::Result
	{
		let count = node.children.len();
		for (i, child) in node.children.iter().enumerate()
		{
			let is_last = i + 1 == count;
			write!(self.sink, "{}{}", prefix, if is_last { "└── " } else { "├── " })?;
			self.write_node(child)?;

			let saved_len = prefix.len();
			prefix.push_str(if is_last { "    " } else { "│   " });
			self.write_children(child, prefix)?;
			prefix.truncate(saved_len);
		}
		Ok( () )
	}
}
