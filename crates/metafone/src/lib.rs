//! `metafone` - Brazilian-Portuguese phonetic name encoding.
//!
//! This crate reduces a person's name to a compact phonetic code so that
//! names a Portuguese speaker would consider sound-alike compare equal:
//! `encode("Sousa") == encode("Souza")`, `encode("Philipe") ==
//! encode("Felipe")`, and so on.
//!
//! The encoding is a Metaphone-family algorithm tuned for Brazilian
//! Portuguese orthography. It is a pure function of the input bytes:
//! deterministic, locale-invariant, and infallible (blank input yields
//! the empty code).
//!
//! # Code alphabet
//!
//! Codes are built from consonant letters plus three digit symbols for
//! sounds Portuguese writes as digraphs:
//!
//! - `1` — palatal L (`lh`, as in *Carvalho*)
//! - `3` — palatal N (`nh`, as in *Sertanho*)
//! - `2` — strong R (word-initial `r` or `rr`, as in *Barros*)
//!
//! Vowels are kept only in word-initial position.
//!
//! # Example
//!
//! ```
//! assert_eq!(metafone::encode("Souza"), metafone::encode("Sousa"));
//! assert_eq!(metafone::encode("Carvalho"), "KRV1");
//! assert_eq!(metafone::encode("Maria da Silva"), "MR D SLV");
//! assert_eq!(metafone::encode(""), "");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

/// Encode a full name into its phonetic code.
///
/// The input is split into words on any non-alphabetic character; each
/// word is encoded independently and the per-word codes are joined with
/// single spaces. Words that encode to nothing (e.g. a lone `h`) are
/// dropped. Blank or non-alphabetic input yields the empty string.
#[must_use]
pub fn encode(name: &str) -> String {
    let mut codes: Vec<String> = Vec::new();
    for word in name.split(|c: char| !c.is_alphabetic()) {
        if word.is_empty() {
            continue;
        }
        let code = encode_word(&normalize(word));
        if !code.is_empty() {
            codes.push(code);
        }
    }
    codes.join(" ")
}

/// Letters that read as vowels before folding, used for the `W` rule.
fn reads_as_vowel(c: char) -> bool {
    matches!(
        c,
        'A' | 'E'
            | 'I'
            | 'O'
            | 'U'
            | 'Y'
            | 'Á'
            | 'À'
            | 'Â'
            | 'Ã'
            | 'Ä'
            | 'É'
            | 'È'
            | 'Ê'
            | 'Ë'
            | 'Í'
            | 'Ì'
            | 'Î'
            | 'Ï'
            | 'Ó'
            | 'Ò'
            | 'Ô'
            | 'Õ'
            | 'Ö'
            | 'Ú'
            | 'Ù'
            | 'Û'
            | 'Ü'
    )
}

/// Normalize one word to uppercase A-Z working letters.
///
/// Folds Portuguese diacritics, expands `ç` to `SS` (it is always the
/// /s/ sound, and the double letter keeps it from being voiced between
/// vowels), maps `y` to `i`, and resolves `w` by context (`v` before a
/// vowel, `u` otherwise). Anything that is not a letter is dropped.
fn normalize(word: &str) -> Vec<char> {
    let upper: Vec<char> = word.chars().flat_map(char::to_uppercase).collect();
    let mut out = Vec::with_capacity(upper.len());
    for (i, &c) in upper.iter().enumerate() {
        match c {
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => out.push('A'),
            'É' | 'È' | 'Ê' | 'Ë' => out.push('E'),
            'Í' | 'Ì' | 'Î' | 'Ï' => out.push('I'),
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => out.push('O'),
            'Ú' | 'Ù' | 'Û' | 'Ü' => out.push('U'),
            'Ç' => {
                out.push('S');
                out.push('S');
            }
            'Y' => out.push('I'),
            'W' => {
                let before_vowel = upper.get(i + 1).is_some_and(|&n| reads_as_vowel(n));
                out.push(if before_vowel { 'V' } else { 'U' });
            }
            'A'..='Z' => out.push(c),
            _ => {}
        }
    }
    out
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'A' | 'E' | 'I' | 'O' | 'U')
}

fn next(w: &[char], i: usize) -> Option<char> {
    w.get(i + 1).copied()
}

fn at(w: &[char], i: usize) -> Option<char> {
    w.get(i).copied()
}

/// True when the letter at `i` sits between two vowels of the word.
fn between_vowels(w: &[char], i: usize) -> bool {
    i > 0 && i + 1 < w.len() && is_vowel(w[i - 1]) && is_vowel(w[i + 1])
}

/// Encode one normalized word.
///
/// Works left to right over the normalized letters; digraph rules
/// consume two letters at once. The rule table is normative for the
/// whole crate: storage-resident codes and query codes must come from
/// the same rules, so any change here invalidates persisted indexes.
fn encode_word(w: &[char]) -> String {
    let mut code = String::new();
    let mut i = 0;
    while i < w.len() {
        let c = w[i];

        // Doubled consonants collapse to one sound (ss, ll, tt, ...).
        // RR is not collapsed here: the R rule turns it into a strong R.
        if i > 0 && c == w[i - 1] && !is_vowel(c) && c != 'R' {
            i += 1;
            continue;
        }

        match c {
            'A' | 'E' | 'I' | 'O' | 'U' => {
                // Vowels survive only in (effective) word-initial position,
                // which also covers words with a silent leading H.
                if code.is_empty() {
                    code.push(c);
                }
                i += 1;
            }
            'C' => {
                if next(w, i) == Some('H') {
                    code.push('X');
                    i += 2;
                } else if matches!(next(w, i), Some('E' | 'I')) {
                    code.push('S');
                    i += 1;
                } else {
                    code.push('K');
                    i += 1;
                }
            }
            'G' => {
                if matches!(next(w, i), Some('E' | 'I')) {
                    code.push('J');
                    i += 1;
                } else if next(w, i) == Some('U') && matches!(at(w, i + 2), Some('E' | 'I')) {
                    // gue/gui: hard G, the U is mute
                    code.push('G');
                    i += 2;
                } else if next(w, i) == Some('H') {
                    code.push('G');
                    i += 2;
                } else {
                    code.push('G');
                    i += 1;
                }
            }
            'H' => {
                // Silent outside the digraphs handled elsewhere.
                i += 1;
            }
            'L' => {
                if next(w, i) == Some('H') {
                    code.push('1');
                    i += 2;
                } else {
                    code.push('L');
                    i += 1;
                }
            }
            'M' => {
                // Final nasal: -m and -n close the same way (Joaquim/Joaquin).
                code.push(if i + 1 == w.len() { 'N' } else { 'M' });
                i += 1;
            }
            'N' => {
                if next(w, i) == Some('H') {
                    code.push('3');
                    i += 2;
                } else {
                    code.push('N');
                    i += 1;
                }
            }
            'P' => {
                if next(w, i) == Some('H') {
                    code.push('F');
                    i += 2;
                } else {
                    code.push('P');
                    i += 1;
                }
            }
            'Q' => {
                code.push('K');
                i += 1;
            }
            'R' => {
                if i == 0 {
                    code.push('2');
                    i += 1;
                } else if next(w, i) == Some('R') {
                    code.push('2');
                    i += 2;
                } else {
                    code.push('R');
                    i += 1;
                }
            }
            'S' => {
                if next(w, i) == Some('C') && matches!(at(w, i + 2), Some('E' | 'I')) {
                    // sce/sci is a single /s/ (Nascimento)
                    code.push('S');
                    i += 2;
                } else if between_vowels(w, i) {
                    code.push('Z');
                    i += 1;
                } else {
                    code.push('S');
                    i += 1;
                }
            }
            'T' => {
                if next(w, i) == Some('H') {
                    code.push('T');
                    i += 2;
                } else {
                    code.push('T');
                    i += 1;
                }
            }
            'Z' => {
                code.push(if i + 1 == w.len() { 'S' } else { 'Z' });
                i += 1;
            }
            other => {
                // B D F J K V X keep their own sound.
                code.push(other);
                i += 1;
            }
        }
    }
    code
}
