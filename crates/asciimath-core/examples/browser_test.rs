use asciimath_core::{AsciiMathConfig, AsciiMathToMathML, MathDisplay, PrettyPrint};

fn main() {
    let inputs = vec![
        // Accents and stacked braces:
        "hat x, bar x, vec x, tilde x, dot x, ddot x",
        "ul x, underline(xxxx), overline(xxxx)",
        "obrace(ubrace(t)_(a))^ba",
        "ubrace({(2x,+,17y,=,23),(x,-,y,=,5):})_(\"equation system\")",
        // Matrices:
        "[[1, |, 2], [a, b, c]]",
        "{:[log_2 16 = 4,], [(2*5-3)/6, ]}",
        "|(a,b),(c,d)|",
        // Large operators:
        "sum_(i=1)^n i^3=((n(n+1))/2)^2",
        "int_0^1 f(x) dx, oint_C F",
        "lim_(x->oo) (1 + 1/x)^x = e",
        // Styles:
        "bb(A) bbb(R) cc(C) tt(T) fr(F) sf(S) color(red)(x) cancel(y)",
    ];

    let converter = AsciiMathToMathML::new(AsciiMathConfig {
        pretty_print: PrettyPrint::Always,
        ..Default::default()
    });
    let outputs = inputs
        .iter()
        .map(|input| {
            format!(
                "<code>{}</code><p>\n{}\n</p>",
                input,
                converter
                    .convert(input, MathDisplay::Block)
                    .expect(input)
            )
        })
        .collect::<Vec<_>>()
        .join("</div>\n<div>");

    println!(
        r#"<!DOCTYPE html><html lang="en">
    <meta charset="UTF-8">
    <style>
        math {{
            font-family: "STIX Two Math", math;
        }}
    </style>
<body>
    <div>{}</div>
</body></html>"#,
        outputs
    );
}
