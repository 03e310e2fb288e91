//! URL slugs for listings and categories.

/// Lowercase ASCII slug: alphanumerics kept, runs of anything else collapse to a single `-`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '_' || ch == '-' || ch.is_whitespace() || ch.is_ascii_punctuation() {
            pending_dash = true;
        }
    }

    slug
}

/// First free slug among `base`, `base-1`, `base-2`, ...
pub fn unique_slug(base: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = if base.is_empty() { "listing" } else { base };
    if !taken(base) {
        return base.to_string();
    }

    let mut suffix = 1u32;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("2019 Toyota  Land-Cruiser!"), "2019-toyota-land-cruiser");
        assert_eq!(slugify("  Villa -- Addis Ababa, Bole "), "villa-addis-ababa-bole");
        assert_eq!(slugify("Ça va"), "a-va");
    }

    #[test]
    fn unique_slug_appends_counter() {
        let taken: HashSet<&str> = ["sussex-hens", "sussex-hens-1"].into_iter().collect();
        assert_eq!(unique_slug("sussex-hens", |s| taken.contains(s)), "sussex-hens-2");
        assert_eq!(unique_slug("leghorn", |s| taken.contains(s)), "leghorn");
    }

    #[test]
    fn empty_base_falls_back() {
        assert_eq!(unique_slug("", |_| false), "listing");
    }
}
