//! Turkish-aware casing.
//!
//! Default Unicode casing maps `I` to `i` and `i` to `I`, which is wrong for
//! Turkish where dotted and dotless I are separate letters. Every comparison or
//! lexicon lookup in the game goes through [`lower`] first.

/// Letters that may appear in a normalized (lowercase) lexicon entry.
pub const LOWERCASE_ALPHABET: &str = "abcçdefgğhıijklmnoöpqrsştuüvwxyz";

/// Rows of the on-screen keyboard, top to bottom.
pub const KEYBOARD_ROWS: [&str; 3] = ["ERTYUIOPĞÜ", "ASDFGHJKLŞİ", "ZCVBNMÖÇ"];

/// Lowercase `s` using Turkish rules: `İ → i`, `I → ı`, everything else by
/// the default mapping.
#[must_use]
pub fn lower(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'İ' => out.push('i'),
            'I' => out.push('ı'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Uppercase `s` using Turkish rules: `i → İ`, `ı → I`, everything else by
/// the default mapping.
#[must_use]
pub fn upper(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'i' => out.push('İ'),
            'ı' => out.push('I'),
            _ => out.extend(c.to_uppercase()),
        }
    }
    out
}

/// Lowercase a single character; always yields exactly one `char` for the
/// Turkish alphabet.
#[must_use]
pub fn lower_char(c: char) -> char {
    match c {
        'İ' => 'i',
        'I' => 'ı',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}

#[must_use]
pub fn upper_char(c: char) -> char {
    match c {
        'i' => 'İ',
        'ı' => 'I',
        _ => c.to_uppercase().next().unwrap_or(c),
    }
}

#[must_use]
pub fn is_lowercase_letter(c: char) -> bool {
    c.is_ascii_lowercase() || matches!(c, 'ç' | 'ğ' | 'ı' | 'ö' | 'ş' | 'ü')
}

#[must_use]
pub fn is_uppercase_letter(c: char) -> bool {
    c.is_ascii_uppercase() || matches!(c, 'Ç' | 'Ğ' | 'İ' | 'Ö' | 'Ş' | 'Ü')
}

/// True if every character of an already-lowered word is in the alphabet.
#[must_use]
pub fn is_lowercase_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(is_lowercase_letter)
}
