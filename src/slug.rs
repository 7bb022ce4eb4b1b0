// 🐌 Slugs - Comparable form of city and street names
// "Rašínovo nábřeží" → "rasinovo-nabrezi", "nábř." → "nabr"

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase ASCII slug: diacritics folded, periods dropped, whitespace → '-'
pub fn slugify(text: &str) -> String {
    let folded: String = text
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| *c != '.')
        .collect();

    let mut slug = String::with_capacity(folded.len());
    for c in folded.chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if !(c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            continue;
        }
        if c == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(c);
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
