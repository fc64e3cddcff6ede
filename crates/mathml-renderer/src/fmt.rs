const INDENT: &str = "    ";

/// Start a new line and indent it `indent_num` levels deep.
///
/// An indent of zero means that pretty-printing is off, in which case nothing is written.
pub fn new_line_and_indent(s: &mut String, indent_num: usize) {
    if indent_num > 0 {
        s.push('\n');
    }
    for _ in 0..indent_num {
        s.push_str(INDENT);
    }
}

/// The indent for the children of a node at `indent_num`.
#[inline]
pub fn nested_indent(indent_num: usize) -> usize {
    if indent_num > 0 {
        indent_num.saturating_add(1)
    } else {
        0
    }
}
