//! Fill-colour substitution in SVG markup.
//!
//! This is a textual pass, not an SVG parser. Every `fill="VALUE"` whose
//! value is non-empty and contains neither a double quote nor a space is
//! rewritten to the target colour. Single-quoted fills, fills set through
//! `style`, inherited fills and values containing spaces are left alone,
//! so some images will only be partly tinted. Note that `fill="none"` is
//! rewritten as well, and so is any attribute whose name merely ends in
//! `fill` (such as `data-fill`).

use crate::types::Colour;

const FILL_OPEN: &str = "fill=\"";

/// Rewrite every simple double-quoted fill attribute to `colour`.
pub fn tint_svg(source: &str, colour: Colour) -> String {
    let replacement = format!("{FILL_OPEN}{}\"", colour.with_alpha(255));
    let mut out = String::with_capacity(source.len());
    let mut copied = 0;
    let mut search = 0;

    while let Some(found) = source[search..].find(FILL_OPEN) {
        let start = search + found;
        let value_start = start + FILL_OPEN.len();
        let value_len = source[value_start..]
            .find(|c: char| c == '"' || c == ' ')
            .filter(|&len| len > 0 && source[value_start + len..].starts_with('"'));

        match value_len {
            Some(len) => {
                out.push_str(&source[copied..start]);
                out.push_str(&replacement);
                copied = value_start + len + 1;
                search = copied;
            }
            // Not a simple value; try again from the next character.
            None => search = start + 1,
        }
    }

    out.push_str(&source[copied..]);
    out
}
