use memchr::memchr;

/// The character references that may stand for characters with a meaning in AsciiMath.
static HTML_ENTITIES: phf::Map<&'static str, char> = phf::phf_map! {
    "#34" => '"',
    "quot" => '"',
    "#38" => '&',
    "amp" => '&',
    "#39" => '\'',
    "apos" => '\'',
    "#60" => '<',
    "lt" => '<',
    "#62" => '>',
    "gt" => '>',
    "#96" => '`',
    "grave" => '`',
    "nbsp" => ' ',
};

/// Replace the character references in `input` that are known to [`HTML_ENTITIES`].
///
/// The result is written into `buffer`, which is cleared first, and a reference to it is
/// returned. Unknown references are copied as they are.
pub fn replace_html_entities<'buf>(buffer: &'buf mut String, input: &str) -> &'buf str {
    buffer.clear();
    buffer.reserve(input.len());

    let bytes = input.as_bytes();
    let mut last_end = 0;
    while let Some(idx) = memchr(b'&', &bytes[last_end..]) {
        let amp = last_end + idx;
        buffer.push_str(&input[last_end..amp]);

        let entity_start = amp + 1;
        let Some(len) = memchr(b';', &bytes[entity_start..]) else {
            // No `;` left, so there are no more references.
            last_end = amp;
            break;
        };
        let end = entity_start + len;
        match HTML_ENTITIES.get(&input[entity_start..end]) {
            Some(replacement) => buffer.push(*replacement),
            None => buffer.push_str(&input[amp..=end]),
        }
        last_end = end + 1;
    }
    buffer.push_str(&input[last_end..]);
    buffer.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_entities() {
        let mut buffer = String::new();
        assert_eq!(replace_html_entities(&mut buffer, "a+b"), "a+b");
    }

    #[test]
    fn known_entities() {
        let mut buffer = String::new();
        assert_eq!(
            replace_html_entities(&mut buffer, "a &lt; b &amp;&amp; &quot;x&#34;"),
            "a < b && \"x\""
        );
        assert_eq!(replace_html_entities(&mut buffer, "&gt;=&#62;"), ">=>");
    }

    #[test]
    fn unknown_entities_are_kept() {
        let mut buffer = String::new();
        assert_eq!(
            replace_html_entities(&mut buffer, "&alpha; &lt;"),
            "&alpha; <"
        );
    }

    #[test]
    fn dangling_ampersand() {
        let mut buffer = String::new();
        assert_eq!(replace_html_entities(&mut buffer, "a & b"), "a & b");
        assert_eq!(replace_html_entities(&mut buffer, "&lt;&"), "<&");
        assert_eq!(replace_html_entities(&mut buffer, "ä&amp;ö"), "ä&ö");
    }

    #[test]
    fn buffer_is_reused() {
        let mut buffer = String::from("left over");
        assert_eq!(replace_html_entities(&mut buffer, "x"), "x");
    }
}
