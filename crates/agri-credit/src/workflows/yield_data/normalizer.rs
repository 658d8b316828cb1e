/// Clean a raw CSV header: trim, spaces to underscores, colons removed.
pub(crate) fn normalize_header(value: &str) -> String {
    value
        .replace('\u{feff}', "")
        .trim()
        .replace(' ', "_")
        .replace(':', "")
}

/// Title-case a free-text key the way census exports spell states and crops.
///
/// A letter is upper-cased when it follows a non-letter and lower-cased otherwise, so
/// `"uttar pradesh"` becomes `"Uttar Pradesh"` and `"RICE"` becomes `"Rice"`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_is_letter = false;
    for ch in value.trim().chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

/// Case-insensitive substring test used for region and crop matching.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
