use mathml_renderer::attribute::{MathVariant, Position};

/// The kind of a bracket. `Invisible` stands for `{:` and `:}`, which match any other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fence {
    Paren,
    Square,
    Brace,
    Angle,
    Invisible,
}

impl Fence {
    /// Whether an opening bracket of kind `self` can be closed by `close`.
    #[inline]
    pub fn is_closed_by(self, close: Fence) -> bool {
        self == close || matches!(self, Fence::Invisible) || matches!(close, Fence::Invisible)
    }

    pub const fn open_glyph(self) -> Option<&'static str> {
        match self {
            Fence::Paren => Some("("),
            Fence::Square => Some("["),
            Fence::Brace => Some("{"),
            Fence::Angle => Some("&#x27E8;"),
            Fence::Invisible => None,
        }
    }

    pub const fn close_glyph(self) -> Option<&'static str> {
        match self {
            Fence::Paren => Some(")"),
            Fence::Square => Some("]"),
            Fence::Brace => Some("}"),
            Fence::Angle => Some("&#x27E9;"),
            Fence::Invisible => None,
        }
    }
}

/// Descriptor of a symbol table entry.
///
/// The `&'static str` payloads are the rendered form, which is either plain ASCII or a hex
/// character reference, so they can be written to the output without escaping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Symbol {
    /// Rendered as `<mi>`: Greek letters and function names like `sin`.
    Ident(&'static str),
    /// Rendered as `<mo>`.
    Op(&'static str),
    /// A large operator whose scripts are placed as limits, e.g. `sum`.
    BigOp(&'static str),
    /// A logical word like `and`, rendered as text with a space on both sides.
    Spaced(&'static str),
    Open(Fence),
    Close(Fence),
    /// `^`
    Circumflex,
    /// `_`
    Underscore,
    /// `/`
    Slash,
    /// `hat`, `bar`, `ul`, ...
    Accent(&'static str, Position),
    /// `obrace` and `ubrace`. Scripts on a brace are stacked on its far side.
    Brace(&'static str, Position),
    /// `abs`, `floor`, `ceil` and `norm`: the operand between two operators.
    Delimit(&'static str, &'static str),
    Sqrt,
    Root,
    Frac,
    Overset,
    Underset,
    Cancel,
    Text,
    Color,
    Style(MathVariant),
}

impl Symbol {
    /// The number of operands this symbol takes.
    pub const fn arity(&self) -> usize {
        match self {
            Symbol::Accent(..)
            | Symbol::Brace(..)
            | Symbol::Delimit(..)
            | Symbol::Sqrt
            | Symbol::Cancel
            | Symbol::Text
            | Symbol::Style(_) => 1,
            Symbol::Root | Symbol::Frac | Symbol::Overset | Symbol::Underset | Symbol::Color => 2,
            _ => 0,
        }
    }
}

/// The length in bytes of the longest key in [`SYMBOLS`] ("twoheadrightarrowtail").
pub const MAX_SPELLING_LEN: usize = 21;

/// Find the longest key of the symbol table that is a prefix of `rest`.
///
/// Returns the symbol and the length of the matched spelling in bytes.
pub fn longest_match(rest: &str) -> Option<(Symbol, usize)> {
    let max_len = rest.len().min(MAX_SPELLING_LEN);
    (1..=max_len).rev().find_map(|len| {
        // `get` returns `None` if `len` is not on a char boundary.
        let candidate = rest.get(..len)?;
        SYMBOLS.get(candidate).map(|symbol| (*symbol, len))
    })
}

static SYMBOLS: phf::Map<&'static str, Symbol> = phf::phf_map! {
    // Greek letters
    "alpha" => Symbol::Ident("&#x3B1;"),
    "beta" => Symbol::Ident("&#x3B2;"),
    "gamma" => Symbol::Ident("&#x3B3;"),
    "Gamma" => Symbol::Ident("&#x393;"),
    "delta" => Symbol::Ident("&#x3B4;"),
    "Delta" => Symbol::Ident("&#x394;"),
    "epsilon" => Symbol::Ident("&#x3B5;"),
    "varepsilon" => Symbol::Ident("&#x25B;"),
    "zeta" => Symbol::Ident("&#x3B6;"),
    "eta" => Symbol::Ident("&#x3B7;"),
    "theta" => Symbol::Ident("&#x3B8;"),
    "Theta" => Symbol::Ident("&#x398;"),
    "vartheta" => Symbol::Ident("&#x3D1;"),
    "iota" => Symbol::Ident("&#x3B9;"),
    "kappa" => Symbol::Ident("&#x3BA;"),
    "lambda" => Symbol::Ident("&#x3BB;"),
    "Lambda" => Symbol::Ident("&#x39B;"),
    "mu" => Symbol::Ident("&#x3BC;"),
    "nu" => Symbol::Ident("&#x3BD;"),
    "xi" => Symbol::Ident("&#x3BE;"),
    "Xi" => Symbol::Ident("&#x39E;"),
    "pi" => Symbol::Ident("&#x3C0;"),
    "Pi" => Symbol::Ident("&#x3A0;"),
    "rho" => Symbol::Ident("&#x3C1;"),
    "sigma" => Symbol::Ident("&#x3C3;"),
    "Sigma" => Symbol::Ident("&#x3A3;"),
    "tau" => Symbol::Ident("&#x3C4;"),
    "upsilon" => Symbol::Ident("&#x3C5;"),
    "phi" => Symbol::Ident("&#x3D5;"),
    "Phi" => Symbol::Ident("&#x3A6;"),
    "varphi" => Symbol::Ident("&#x3C6;"),
    "chi" => Symbol::Ident("&#x3C7;"),
    "psi" => Symbol::Ident("&#x3C8;"),
    "Psi" => Symbol::Ident("&#x3A8;"),
    "omega" => Symbol::Ident("&#x3C9;"),
    "Omega" => Symbol::Ident("&#x3A9;"),
    // Needs escaping in the output.
    "&" => Symbol::Ident("&amp;"),

    // Standard functions
    "sin" => Symbol::Ident("sin"),
    "cos" => Symbol::Ident("cos"),
    "tan" => Symbol::Ident("tan"),
    "sec" => Symbol::Ident("sec"),
    "csc" => Symbol::Ident("csc"),
    "cot" => Symbol::Ident("cot"),
    "arcsin" => Symbol::Ident("arcsin"),
    "arccos" => Symbol::Ident("arccos"),
    "arctan" => Symbol::Ident("arctan"),
    "sinh" => Symbol::Ident("sinh"),
    "cosh" => Symbol::Ident("cosh"),
    "tanh" => Symbol::Ident("tanh"),
    "sech" => Symbol::Ident("sech"),
    "csch" => Symbol::Ident("csch"),
    "coth" => Symbol::Ident("coth"),
    "exp" => Symbol::Ident("exp"),
    "log" => Symbol::Ident("log"),
    "ln" => Symbol::Ident("ln"),
    "det" => Symbol::Ident("det"),
    "dim" => Symbol::Ident("dim"),
    "mod" => Symbol::Ident("mod"),
    "gcd" => Symbol::Ident("gcd"),
    "lcm" => Symbol::Ident("lcm"),
    "lub" => Symbol::Ident("lub"),
    "glb" => Symbol::Ident("glb"),
    "min" => Symbol::Ident("min"),
    "max" => Symbol::Ident("max"),

    // Operations
    "+" => Symbol::Op("+"),
    "-" => Symbol::Op("-"),
    "*" => Symbol::Op("&#x22C5;"),
    "cdot" => Symbol::Op("&#x22C5;"),
    "**" => Symbol::Op("&#x2217;"),
    "ast" => Symbol::Op("&#x2217;"),
    "***" => Symbol::Op("&#x22C6;"),
    "star" => Symbol::Op("&#x22C6;"),
    "//" => Symbol::Op("/"),
    "\\\\" => Symbol::Op("\\"),
    "backslash" => Symbol::Op("\\"),
    "setminus" => Symbol::Op("\\"),
    "xx" => Symbol::Op("&#xD7;"),
    "times" => Symbol::Op("&#xD7;"),
    "-:" => Symbol::Op("&#xF7;"),
    "div" => Symbol::Op("&#xF7;"),
    "|><" => Symbol::Op("&#x22C9;"),
    "ltimes" => Symbol::Op("&#x22C9;"),
    "><|" => Symbol::Op("&#x22CA;"),
    "rtimes" => Symbol::Op("&#x22CA;"),
    "|><|" => Symbol::Op("&#x22C8;"),
    "bowtie" => Symbol::Op("&#x22C8;"),
    "@" => Symbol::Op("&#x2218;"),
    "circ" => Symbol::Op("&#x2218;"),
    "o+" => Symbol::Op("&#x2295;"),
    "oplus" => Symbol::Op("&#x2295;"),
    "ox" => Symbol::Op("&#x2297;"),
    "otimes" => Symbol::Op("&#x2297;"),
    "o." => Symbol::Op("&#x2299;"),
    "odot" => Symbol::Op("&#x2299;"),
    "^^" => Symbol::Op("&#x2227;"),
    "wedge" => Symbol::Op("&#x2227;"),
    "vv" => Symbol::Op("&#x2228;"),
    "vee" => Symbol::Op("&#x2228;"),
    "nn" => Symbol::Op("&#x2229;"),
    "cap" => Symbol::Op("&#x2229;"),
    "uu" => Symbol::Op("&#x222A;"),
    "cup" => Symbol::Op("&#x222A;"),
    "|" => Symbol::Op("|"),

    // Large operators
    "sum" => Symbol::BigOp("&#x2211;"),
    "prod" => Symbol::BigOp("&#x220F;"),
    "^^^" => Symbol::BigOp("&#x22C0;"),
    "bigwedge" => Symbol::BigOp("&#x22C0;"),
    "vvv" => Symbol::Op("&#x22C1;"),
    "bigvee" => Symbol::Op("&#x22C1;"),
    "nnn" => Symbol::BigOp("&#x22C2;"),
    "bigcap" => Symbol::BigOp("&#x22C2;"),
    "uuu" => Symbol::BigOp("&#x22C3;"),
    "bigcup" => Symbol::BigOp("&#x22C3;"),
    "lim" => Symbol::BigOp("lim"),

    // Miscellaneous symbols
    "int" => Symbol::Op("&#x222B;"),
    "oint" => Symbol::Op("&#x222E;"),
    "del" => Symbol::Op("&#x2202;"),
    "partial" => Symbol::Op("&#x2202;"),
    "grad" => Symbol::Op("&#x2207;"),
    "nabla" => Symbol::Op("&#x2207;"),
    "+-" => Symbol::Op("&#xB1;"),
    "pm" => Symbol::Op("&#xB1;"),
    "O/" => Symbol::Op("&#x2205;"),
    "emptyset" => Symbol::Op("&#x2205;"),
    "oo" => Symbol::Op("&#x221E;"),
    "infty" => Symbol::Op("&#x221E;"),
    "aleph" => Symbol::Op("&#x2135;"),
    ":." => Symbol::Op("&#x2234;"),
    "therefore" => Symbol::Op("&#x2234;"),
    ":'" => Symbol::Op("&#x2235;"),
    "because" => Symbol::Op("&#x2235;"),
    "..." => Symbol::Op("&#x2026;"),
    "ldots" => Symbol::Op("&#x2026;"),
    "cdots" => Symbol::Op("&#x22EF;"),
    "vdots" => Symbol::Op("&#x22EE;"),
    "ddots" => Symbol::Op("&#x22F1;"),
    "/_" => Symbol::Op("&#x2220;"),
    "angle" => Symbol::Op("&#x2220;"),
    "frown" => Symbol::Op("&#x2322;"),
    "/_\\" => Symbol::Op("&#x25B3;"),
    "triangle" => Symbol::Op("&#x25B3;"),
    "diamond" => Symbol::Op("&#x22C4;"),
    "square" => Symbol::Op("&#x25A1;"),
    "|__" => Symbol::Op("&#x230A;"),
    "lfloor" => Symbol::Op("&#x230A;"),
    "__|" => Symbol::Op("&#x230B;"),
    "rfloor" => Symbol::Op("&#x230B;"),
    "|~" => Symbol::Op("&#x2308;"),
    "lceiling" => Symbol::Op("&#x2308;"),
    "~|" => Symbol::Op("&#x2309;"),
    "rceiling" => Symbol::Op("&#x2309;"),
    "CC" => Symbol::Op("&#x2102;"),
    "NN" => Symbol::Op("&#x2115;"),
    "QQ" => Symbol::Op("&#x211A;"),
    "RR" => Symbol::Op("&#x211D;"),
    "ZZ" => Symbol::Op("&#x2124;"),
    "\\ " => Symbol::Op("&#xA0;"),
    "quad" => Symbol::Op("&#xA0;&#xA0;"),
    "qquad" => Symbol::Op("&#xA0;&#xA0;&#xA0;&#xA0;"),

    // Relations
    "=" => Symbol::Op("="),
    "!=" => Symbol::Op("&#x2260;"),
    "ne" => Symbol::Op("&#x2260;"),
    "neq" => Symbol::Op("&#x2260;"),
    "<" => Symbol::Op("&lt;"),
    "lt" => Symbol::Op("&lt;"),
    ">" => Symbol::Op("&gt;"),
    "gt" => Symbol::Op("&gt;"),
    "<=" => Symbol::Op("&#x2264;"),
    "le" => Symbol::Op("&#x2264;"),
    ">=" => Symbol::Op("&#x2265;"),
    "ge" => Symbol::Op("&#x2265;"),
    "mlt" => Symbol::Op("&#x226A;"),
    "ll" => Symbol::Op("&#x226A;"),
    "mgt" => Symbol::Op("&#x226B;"),
    "gg" => Symbol::Op("&#x226B;"),
    "-<" => Symbol::Op("&#x227A;"),
    "prec" => Symbol::Op("&#x227A;"),
    "-<=" => Symbol::Op("&#x2AAF;"),
    "preceq" => Symbol::Op("&#x2AAF;"),
    ">-" => Symbol::Op("&#x227B;"),
    "succ" => Symbol::Op("&#x227B;"),
    ">-=" => Symbol::Op("&#x2AB0;"),
    "succeq" => Symbol::Op("&#x2AB0;"),
    "in" => Symbol::Op("&#x2208;"),
    "!in" => Symbol::Op("&#x2209;"),
    "notin" => Symbol::Op("&#x2209;"),
    "sub" => Symbol::Op("&#x2282;"),
    "subset" => Symbol::Op("&#x2282;"),
    "sup" => Symbol::Op("&#x2283;"),
    "supset" => Symbol::Op("&#x2283;"),
    "sube" => Symbol::Op("&#x2286;"),
    "subseteq" => Symbol::Op("&#x2286;"),
    "supe" => Symbol::Op("&#x2287;"),
    "supseteq" => Symbol::Op("&#x2287;"),
    "-=" => Symbol::Op("&#x2261;"),
    "equiv" => Symbol::Op("&#x2261;"),
    "~=" => Symbol::Op("&#x2245;"),
    "cong" => Symbol::Op("&#x2245;"),
    "~~" => Symbol::Op("&#x2248;"),
    "approx" => Symbol::Op("&#x2248;"),
    "prop" => Symbol::Op("&#x221D;"),
    "propto" => Symbol::Op("&#x221D;"),

    // Arrows
    "uarr" => Symbol::Op("&#x2191;"),
    "uparrow" => Symbol::Op("&#x2191;"),
    "darr" => Symbol::Op("&#x2193;"),
    "downarrow" => Symbol::Op("&#x2193;"),
    "rarr" => Symbol::Op("&#x2192;"),
    "rightarrow" => Symbol::Op("&#x2192;"),
    "->" => Symbol::Op("&#x2192;"),
    "to" => Symbol::Op("&#x2192;"),
    ">->" => Symbol::Op("&#x21A3;"),
    "rightarrowtail" => Symbol::Op("&#x21A3;"),
    "->>" => Symbol::Op("&#x21A0;"),
    "twoheadrightarrow" => Symbol::Op("&#x21A0;"),
    ">->>" => Symbol::Op("&#x2916;"),
    "twoheadrightarrowtail" => Symbol::Op("&#x2916;"),
    "|->" => Symbol::Op("&#x21A6;"),
    "mapsto" => Symbol::Op("&#x21A6;"),
    "larr" => Symbol::Op("&#x2190;"),
    "leftarrow" => Symbol::Op("&#x2190;"),
    "harr" => Symbol::Op("&#x2194;"),
    "leftrightarrow" => Symbol::Op("&#x2194;"),
    "rArr" => Symbol::Op("&#x21D2;"),
    "Rightarrow" => Symbol::Op("&#x21D2;"),
    "lArr" => Symbol::Op("&#x21D0;"),
    "Leftarrow" => Symbol::Op("&#x21D0;"),
    "hArr" => Symbol::Op("&#x21D4;"),
    "Leftrightarrow" => Symbol::Op("&#x21D4;"),

    // Logic
    "and" => Symbol::Spaced("and"),
    "or" => Symbol::Spaced("or"),
    "if" => Symbol::Spaced("if"),
    "not" => Symbol::Op("&#xAC;"),
    "neg" => Symbol::Op("&#xAC;"),
    "=>" => Symbol::Op("&#x21D2;"),
    "implies" => Symbol::Op("&#x21D2;"),
    "<=>" => Symbol::Op("&#x21D4;"),
    "iff" => Symbol::Op("&#x21D4;"),
    "AA" => Symbol::Op("&#x2200;"),
    "forall" => Symbol::Op("&#x2200;"),
    "EE" => Symbol::Op("&#x2203;"),
    "exists" => Symbol::Op("&#x2203;"),
    "_|_" => Symbol::Op("&#x22A5;"),
    "bot" => Symbol::Op("&#x22A5;"),
    "TT" => Symbol::Op("&#x22A4;"),
    "top" => Symbol::Op("&#x22A4;"),
    "|--" => Symbol::Op("&#x22A2;"),
    "vdash" => Symbol::Op("&#x22A2;"),
    "|==" => Symbol::Op("&#x22A8;"),
    "models" => Symbol::Op("&#x22A8;"),

    // Brackets
    "(" => Symbol::Open(Fence::Paren),
    ")" => Symbol::Close(Fence::Paren),
    "[" => Symbol::Open(Fence::Square),
    "]" => Symbol::Close(Fence::Square),
    "{" => Symbol::Open(Fence::Brace),
    "}" => Symbol::Close(Fence::Brace),
    "(:" => Symbol::Open(Fence::Angle),
    ":)" => Symbol::Close(Fence::Angle),
    "<<" => Symbol::Open(Fence::Angle),
    ">>" => Symbol::Close(Fence::Angle),
    "langle" => Symbol::Open(Fence::Angle),
    "rangle" => Symbol::Close(Fence::Angle),
    "{:" => Symbol::Open(Fence::Invisible),
    ":}" => Symbol::Close(Fence::Invisible),

    // Scripts and fractions
    "^" => Symbol::Circumflex,
    "_" => Symbol::Underscore,
    "/" => Symbol::Slash,

    // Accents
    "hat" => Symbol::Accent("^", Position::Over),
    "bar" => Symbol::Accent("&#xAF;", Position::Over),
    "overline" => Symbol::Accent("&#xAF;", Position::Over),
    "vec" => Symbol::Accent("&#x2192;", Position::Over),
    "tilde" => Symbol::Accent("~", Position::Over),
    "dot" => Symbol::Accent(".", Position::Over),
    "ddot" => Symbol::Accent("..", Position::Over),
    "ul" => Symbol::Accent("&#x332;", Position::Under),
    "underline" => Symbol::Accent("&#x332;", Position::Under),
    "obrace" => Symbol::Brace("&#x23DE;", Position::Over),
    "overbrace" => Symbol::Brace("&#x23DE;", Position::Over),
    "ubrace" => Symbol::Brace("&#x23DF;", Position::Under),
    "underbrace" => Symbol::Brace("&#x23DF;", Position::Under),

    // Functions with operands
    "abs" => Symbol::Delimit("|", "|"),
    "floor" => Symbol::Delimit("&#x230A;", "&#x230B;"),
    "ceil" => Symbol::Delimit("&#x2308;", "&#x2309;"),
    "norm" => Symbol::Delimit("&#x2225;", "&#x2225;"),
    "sqrt" => Symbol::Sqrt,
    "root" => Symbol::Root,
    "frac" => Symbol::Frac,
    "overset" => Symbol::Overset,
    "stackrel" => Symbol::Overset,
    "underset" => Symbol::Underset,
    "cancel" => Symbol::Cancel,
    "text" => Symbol::Text,
    "mbox" => Symbol::Text,
    "color" => Symbol::Color,

    // Font styles
    "bb" => Symbol::Style(MathVariant::Bold),
    "bbb" => Symbol::Style(MathVariant::DoubleStruck),
    "cc" => Symbol::Style(MathVariant::Script),
    "tt" => Symbol::Style(MathVariant::Monospace),
    "fr" => Symbol::Style(MathVariant::Fraktur),
    "sf" => Symbol::Style(MathVariant::SansSerif),
};
