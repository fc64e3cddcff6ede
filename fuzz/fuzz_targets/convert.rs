#![no_main]

use asciimath_core::{MathDisplay, convert};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Any input either converts to a complete `<math>` element or fails with an error.
    if let Ok(mathml) = convert(data, MathDisplay::Block) {
        assert!(mathml.starts_with("<math display=\"block\">"));
        assert!(mathml.ends_with("</math>"));
    }
});
