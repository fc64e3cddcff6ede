use std::thread;

use asciimath_core::{
    AsciiMathConfig, AsciiMathToMathML, MathDisplay, ParseErrorKind, PrettyPrint, convert,
};

const CORPUS: &[&str] = &[
    "sum_(i=1)^n i^3=((n(n+1))/2)^2",
    "int_0^1 f(x) dx",
    "lim_(x->oo) (1 + 1/x)^x = e",
    "[[a,b],[c,d]]",
    "((1,0),(0,1))",
    "{:(x, =, 1), (y, =, 2):}",
    "abs(x) <= norm(v)",
    "hat x + bar y + vec z",
    "sqrt(a^2 + b^2)",
    "root(3)(x)",
    "frac(1)(2) + 3/4",
    "stackrel(def)(=) overset(!)(=) underset(x)(lim)",
    "obrace(1+2+3)^(\"six\")",
    "ubrace(a+b)_(c)",
    "cancel(x) color(red)(y) bb(A) cc(B) tt(C) fr(D) sf(E) bbb(R)",
    "text(hello world) and \"quoted\" or if",
    "a/b/c/d",
    "x_1^2 y^2_1",
    "alpha beta gamma Gamma delta Delta",
    "<< a, b >> (: c :)",
    "floor(x) ceil(y)",
    "ȳ? Ц & a<b",
    "",
];

/// Check that every element is closed in reverse order, and that there is exactly one
/// top-level element.
fn assert_well_formed(output: &str) {
    let mut stack = Vec::new();
    let mut roots = 0;
    let mut rest = output;
    while let Some(start) = rest.find('<') {
        let end = start + rest[start..].find('>').expect("unclosed tag");
        let tag = &rest[start + 1..end];
        if let Some(name) = tag.strip_prefix('/') {
            assert_eq!(stack.pop(), Some(name), "in {output}");
        } else if !tag.ends_with('/') {
            if stack.is_empty() {
                roots += 1;
            }
            stack.push(tag.split_whitespace().next().unwrap());
        }
        rest = &rest[end + 1..];
    }
    assert!(stack.is_empty(), "unclosed elements {stack:?} in {output}");
    assert_eq!(roots, 1, "in {output}");
}

/// A small xorshift generator, so that the generated inputs are the same on every run.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> usize {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 33) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.next() % items.len()]
    }
}

const ATOMS: &[&str] = &[
    "a", "x", "2", "3.5", "+", "-", "=", "/", "^", "_", ",", "|", "sum", "int", "sqrt", "frac",
    "root", "hat", "ubrace", "obrace", "abs", "bb", "cancel", "alpha", "oo", "->", "and", "sin",
    "lim", "<=", "**",
];

const BRACKETS: &[(&str, &str)] = &[("(", ")"), ("[", "]"), ("{", "}"), ("(:", ":)")];

/// Generate a sequence of tokens with properly nested brackets.
fn generate<'a>(rng: &mut Rng, depth: usize, out: &mut Vec<&'a str>) {
    for _ in 0..=rng.next() % 4 {
        if depth < 4 && rng.next() % 3 == 0 {
            let (open, close) = BRACKETS[rng.next() % BRACKETS.len()];
            out.push(open);
            generate(rng, depth + 1, out);
            out.push(close);
        } else {
            out.push(rng.pick(ATOMS));
        }
    }
}

#[test]
fn corpus_is_well_formed() {
    for problem in CORPUS {
        let output = convert(problem, MathDisplay::Block)
            .unwrap_or_else(|err| panic!("{problem:?} failed: {err}"));
        assert_well_formed(&output);
    }
}

#[test]
fn generated_inputs_are_well_formed_or_fail() {
    let mut rng = Rng(0x2545_F491_4F6C_DD1D);
    for _ in 0..2000 {
        let mut tokens = Vec::new();
        generate(&mut rng, 0, &mut tokens);
        let problem = tokens.join(" ");
        if let Ok(output) = convert(&problem, MathDisplay::Inline) {
            assert_well_formed(&output);
        }
    }
}

#[test]
fn dropped_closing_bracket_is_unbalanced() {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    let closing: Vec<&str> = BRACKETS.iter().map(|(_, close)| *close).collect();
    let mut checked = 0;
    for _ in 0..2000 {
        let mut tokens = Vec::new();
        generate(&mut rng, 0, &mut tokens);
        let positions: Vec<usize> = (0..tokens.len())
            .filter(|i| closing.contains(&tokens[*i]))
            .collect();
        if positions.is_empty() {
            continue;
        }
        tokens.remove(positions[rng.next() % positions.len()]);
        let problem = tokens.join(" ");
        let err = convert(&problem, MathDisplay::Block).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnbalancedBracket, "{problem:?}");
        checked += 1;
    }
    assert!(checked > 100);
}

#[test]
fn mismatched_brackets_are_unbalanced() {
    for problem in [
        "(]",
        "[)",
        "{)",
        "(: ]",
        "(a[b)c]",
        ")(",
        "a]",
        "{",
        "x + (y",
        "(a] \"x",
        ") \"x",
        "[a) text(b",
    ] {
        let err = convert(problem, MathDisplay::Block).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnbalancedBracket, "{problem:?}");
    }
}

#[test]
fn deep_nesting_fails_closed() {
    let problem = "(".repeat(100_000) + &")".repeat(100_000);
    let err = convert(&problem, MathDisplay::Block).unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::RecursionLimitExceeded);

    let problem = vec!["x"; 100_000].join("/");
    let err = convert(&problem, MathDisplay::Block).unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::RecursionLimitExceeded);
}

#[test]
fn pretty_print_only_adds_whitespace() {
    let pretty = AsciiMathToMathML::new(AsciiMathConfig {
        pretty_print: PrettyPrint::Always,
        ..Default::default()
    });
    for problem in CORPUS {
        let compact = convert(problem, MathDisplay::Block).unwrap();
        let output = pretty.convert(problem, MathDisplay::Block).unwrap();
        assert_well_formed(&output);
        let joined: String = output.lines().map(str::trim_start).collect();
        assert_eq!(joined, compact, "{problem:?}");
    }
}

#[test]
fn annotation_is_well_formed() {
    let converter = AsciiMathToMathML::new(AsciiMathConfig {
        pretty_print: PrettyPrint::Auto,
        xml_namespace: true,
        annotation: true,
    });
    for problem in CORPUS {
        for display in [MathDisplay::Block, MathDisplay::Inline] {
            let output = converter.convert(problem, display).unwrap();
            assert_well_formed(&output);
            assert!(output.contains("<annotation encoding=\"text/x-asciimath\">"));
        }
    }
}

#[test]
fn concurrent_conversions_agree() {
    let converter = AsciiMathToMathML::default();
    let expected: Vec<String> = CORPUS
        .iter()
        .map(|problem| converter.convert(problem, MathDisplay::Block).unwrap())
        .collect();
    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..50 {
                    for (problem, expected) in CORPUS.iter().zip(&expected) {
                        assert_eq!(
                            &converter.convert(problem, MathDisplay::Block).unwrap(),
                            expected
                        );
                    }
                }
            });
        }
    });
}
