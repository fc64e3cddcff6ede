use strum_macros::IntoStaticStr;

/// `mathvariant` values reachable through the font commands `bb`, `bbb`, `cc`, `tt`, `fr` and
/// `sf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum MathVariant {
    #[strum(serialize = "bold")]
    Bold,
    #[strum(serialize = "double-struck")]
    DoubleStruck,
    #[strum(serialize = "script")]
    Script,
    #[strum(serialize = "monospace")]
    Monospace,
    #[strum(serialize = "fraktur")]
    Fraktur,
    #[strum(serialize = "sans-serif")]
    SansSerif,
}

/// <menclose> notation attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum Notation {
    #[strum(serialize = "updiagonalstrike")]
    UpDiagonalStrike,
}

/// One entry of the `columnlines` attribute of `<mtable>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum ColumnLine {
    #[strum(serialize = "solid")]
    Solid,
    #[strum(serialize = "none")]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Over,
    Under,
}

impl Position {
    /// The MathML element that puts a script at this position.
    #[inline]
    pub const fn element(self) -> &'static str {
        match self {
            Position::Over => "mover",
            Position::Under => "munder",
        }
    }
}

/// Where the scripts of a `SubSup` node are placed relative to its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPlacement {
    /// Regular sub- and superscripts (`<msub>`, `<msup>`, `<msubsup>`).
    Attached,
    /// Limits below and above the base, as for `sum` and `lim`.
    Limits,
    /// Limits on a base that is first wrapped in one more `<munder>` or `<mover>`.
    ///
    /// This is how a script on a horizontal brace is stacked underneath (or on top of) the
    /// brace itself.
    Stacked(Position),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_strings() {
        assert_eq!(<&str>::from(MathVariant::DoubleStruck), "double-struck");
        assert_eq!(<&str>::from(MathVariant::SansSerif), "sans-serif");
        assert_eq!(<&str>::from(Notation::UpDiagonalStrike), "updiagonalstrike");
        assert_eq!(<&str>::from(ColumnLine::Solid), "solid");
        assert_eq!(<&str>::from(ColumnLine::None), "none");
    }
}
