//! String helpers for default labels

/// Turn a camelCase property key into Title Case text.
///
/// Every uppercase letter gets a space in front of it and the first
/// character is uppercased: `firstName` becomes `First Name`.
pub fn camel_to_title(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
