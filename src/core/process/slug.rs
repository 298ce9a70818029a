//! Label derivation from product names

use unicode_normalization::UnicodeNormalization;

/// Normalize a display name into a URL-safe slug
///
/// Compatibility-decomposes the text, drops everything outside ASCII
/// (which removes diacritics), lowercases, turns each run of
/// non-alphanumeric characters into a single hyphen and trims hyphens from
/// both ends.
///
/// # Examples
///
/// ```
/// use skulabel::core::process::slugify;
///
/// assert_eq!(slugify("Óleo Essencial"), "oleo-essencial");
/// assert_eq!(slugify("  --  "), "");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut separator = false;

    for c in text.nfkd().filter(char::is_ascii) {
        if c.is_ascii_alphanumeric() {
            if separator && !slug.is_empty() {
                slug.push('-');
            }
            separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            separator = true;
        }
    }

    slug
}

/// Target labels `{slug}_1 .. {slug}_n` in image order
pub fn target_labels(slug: &str, count: usize) -> Vec<String> {
    (1..=count).map(|position| format!("{slug}_{position}")).collect()
}
