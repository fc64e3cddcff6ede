use asciimath_core::{AsciiMathConfig, AsciiMathToMathML, MathDisplay, ParseError, ParseErrorKind};

fn convert_err(converter: &AsciiMathToMathML, problem: &str) -> ParseError {
    let Err(error) = converter
        .convert(problem, MathDisplay::Inline)
        .map_err(|e| *e)
    else {
        panic!("problem `{}` did not return an error", problem);
    };
    error
}

fn report(error: &ParseError, problem: &str) -> String {
    let report = error.to_report("<input>", false);
    let mut buf = Vec::new();
    report
        .write(("<input>", ariadne::Source::from(problem)), &mut buf)
        .expect("failed to write report");
    String::from_utf8(buf).expect("report should be valid UTF-8")
}

#[test]
fn main() {
    use ParseErrorKind::*;

    let problems = [
        ("unclosed_paren", "(a", UnbalancedBracket, 0),
        ("close_without_open", "a)", UnbalancedBracket, 1),
        ("mismatched_bracket", "(a]", UnbalancedBracket, 2),
        ("mismatched_after_unicode", "Ц(a}", UnbalancedBracket, 4),
        ("fuzz_mismatched", "{]!(", UnbalancedBracket, 1),
        ("fuzz_mismatched_multiline", "Y{]\n        ]{:}]]]", UnbalancedBracket, 2),
        ("unclosed_inside_matrix", "[[1,2],[3,4]", UnbalancedBracket, 0),
        ("unterminated_quote", "\"abc", UnterminatedText, 0),
        ("unterminated_quote_after_bracket", "{Ц\"2", UnterminatedText, 3),
        ("mismatched_before_quote", "(a] \"x", UnbalancedBracket, 2),
        ("close_before_quote", ") \"x", UnbalancedBracket, 0),
        ("unterminated_text_argument", "text(abc", UnterminatedText, 4),
        ("unterminated_color_argument", "color{red x", UnterminatedText, 5),
        ("sup_sup", "x^1^2", ExtraneousModifier, 3),
        ("sub_sub", "x_1_2", ExtraneousModifier, 3),
        ("sub_sup_sub", "x_1^2_3", ExtraneousModifier, 5),
        ("limits_sup_sup", "sum^1^2", ExtraneousModifier, 5),
        ("incomplete_sup", "x^", UnexpectedEndOfInput, 2),
        ("incomplete_sqrt", "sqrt  ", UnexpectedEndOfInput, 6),
        ("incomplete_frac", "frac(a)", UnexpectedEndOfInput, 7),
        ("incomplete_fraction", "a/", UnexpectedEndOfInput, 2),
        ("text_at_eof", "text", UnexpectedEndOfInput, 4),
        ("sqrt_closed", "(sqrt)", MissingOperand, 5),
        ("sup_closed", "(x^)", MissingOperand, 3),
        ("leading_slash", "/2", MissingOperand, 0),
        ("sub_then_sup", "x_^2", MissingOperand, 2),
        ("text_without_bracket", "text x", MissingOperand, 5),
        ("color_without_bracket", "color x", MissingOperand, 6),
    ];

    let converter = AsciiMathToMathML::new(AsciiMathConfig::default());
    for (name, problem, kind, offset) in problems.into_iter() {
        let error = convert_err(&converter, problem);
        assert_eq!(error.kind(), kind, "{name}: {problem:?}");
        assert_eq!(error.offset(), offset, "{name}: {problem:?}");

        let output = report(&error, problem);
        assert!(
            output.contains(kind.string()),
            "{name}: report does not contain the message:\n{output}"
        );
    }
}

#[test]
fn deep_nesting() {
    let converter = AsciiMathToMathML::default();

    let problem = "(".repeat(200) + &")".repeat(200);
    let error = convert_err(&converter, &problem);
    assert_eq!(error.kind(), ParseErrorKind::RecursionLimitExceeded);
    assert_eq!(error.offset(), 128);

    let problem = "sqrt ".repeat(100_000) + "x";
    let error = convert_err(&converter, &problem);
    assert_eq!(error.kind(), ParseErrorKind::RecursionLimitExceeded);
}

#[test]
fn html_error() {
    let problem = "x^1^<2>";
    let error = convert_err(&AsciiMathToMathML::default(), problem);
    assert_eq!(
        error.to_html(problem, MathDisplay::Block, None),
        r#"<p class="asciimath-error" title="3: Duplicate subscript or superscript on the same base."><code>x^1^&lt;2&gt;</code></p>"#
    );
}
