// 🧹 Text Normalizer - Dash variants and repeated spaces
// First step of the line pipeline, never fails

/// Note fragment emitted when a Unicode dash was rewritten
pub const DASH_REPLACED_NOTE: &str = "UTF Dash has been replaced with hyphen";

/// Figure dash, en dash, em dash, horizontal bar
const DASH_VARIANTS: [char; 4] = ['\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub dash_replaced: bool,
}

impl Normalized {
    pub fn note(&self) -> Option<&'static str> {
        self.dash_replaced.then_some(DASH_REPLACED_NOTE)
    }
}

/// Replace Unicode dashes with `-` and collapse runs of spaces
pub fn normalize(line: &str) -> Normalized {
    let mut text = String::with_capacity(line.len());
    let mut dash_replaced = false;
    let mut previous_space = false;

    for c in line.chars() {
        if DASH_VARIANTS.contains(&c) {
            dash_replaced = true;
            text.push('-');
            previous_space = false;
        } else if c == ' ' {
            if !previous_space {
                text.push(' ');
            }
            previous_space = true;
        } else {
            text.push(c);
            previous_space = false;
        }
    }

    Normalized { text, dash_replaced }
}
