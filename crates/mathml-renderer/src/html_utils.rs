/// Escape `&`, `<` and `>` for use in HTML or MathML text content.
pub fn escape_html_content(output: &mut String, input: &str) {
    escape(output, input, [b'&', b'<', b'>']);
}

/// Escape `&`, `"` and `<` for use in a double-quoted HTML attribute value.
pub fn escape_double_quoted_html_attribute(output: &mut String, input: &str) {
    escape(output, input, [b'&', b'"', b'<']);
}

fn escape(output: &mut String, input: &str, [a, b, c]: [u8; 3]) {
    let mut rest = input;
    while let Some(index) = memchr::memchr3(a, b, c, rest.as_bytes()) {
        // The needles are ASCII, so `index` and `index + 1` are char boundaries.
        output.push_str(&rest[..index]);
        output.push_str(match rest.as_bytes()[index] {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ => "&quot;",
        });
        rest = &rest[index + 1..];
    }
    output.push_str(rest);
}
