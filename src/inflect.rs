//! Deterministic naming helpers used to key derived relations.

/// Latin-1 aware uppercase test (`A-Z`, `À-Ö`, `Ø-Þ`).
fn is_upper(c: char) -> bool {
    c.is_ascii_uppercase() || ('\u{C0}'..='\u{D6}').contains(&c) || ('\u{D8}'..='\u{DE}').contains(&c)
}

/// Latin-1 aware lowercase test (`a-z`, `ß-ö`, `ø-ÿ`).
fn is_lower(c: char) -> bool {
    c.is_ascii_lowercase() || ('\u{DF}'..='\u{F6}').contains(&c) || ('\u{F8}'..='\u{FF}').contains(&c)
}

/// Split into words at case changes, digit runs and punctuation.
///
/// A word is an optional capital followed by lowercase letters, a run of
/// capitals not followed by a lowercase letter, or a run of digits. In
/// `HTTPServer` the run `HTTPS` gives its last capital back to `Server`.
pub fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;
        if c.is_ascii_digit() {
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        } else if is_lower(c) {
            while i < chars.len() && is_lower(chars[i]) {
                i += 1;
            }
        } else if is_upper(c) {
            if chars.get(i + 1).is_some_and(|&n| is_lower(n)) {
                i += 1;
                while i < chars.len() && is_lower(chars[i]) {
                    i += 1;
                }
            } else {
                while i < chars.len() && is_upper(chars[i]) {
                    i += 1;
                }
                if i < chars.len() && is_lower(chars[i]) {
                    // Leave the last capital to start the next word.
                    i -= 1;
                }
            }
        } else {
            i += 1;
            continue;
        }
        words.push(chars[start..i].iter().collect());
    }

    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `user_role`, `UserRole` and `user role` all become `userRole`.
pub fn camel_case(input: &str) -> String {
    words(input)
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i == 0 { lower } else { capitalize(&lower) }
        })
        .collect()
}

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
    "metadata",
    "feedback",
    "staff",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("ox", "oxen"),
    ("datum", "data"),
    ("index", "indices"),
];

/// English plural of the last word of a camelCase identifier.
///
/// Leading words are kept untouched: `salesPerson` becomes `salesPeople`.
/// Words already ending in a plural `s` are returned as is.
pub fn pluralize(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    // Last word starts at the last capital letter.
    let split = input
        .char_indices()
        .filter(|(_, c)| is_upper(*c))
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    let (head, tail) = input.split_at(split);
    let lower = tail.to_lowercase();

    let plural = plural_word(&lower);
    let starts_upper = tail.chars().next().is_some_and(is_upper);
    let tail = if starts_upper { capitalize(&plural) } else { plural };
    format!("{head}{tail}")
}

fn plural_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return plural.to_string();
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == word) {
        return word.to_string();
    }

    let ends_with_consonant_then = |suffix: char| {
        let mut rev = word.chars().rev();
        rev.next() == Some(suffix) && rev.next().is_some_and(|c| !"aeiou".contains(c))
    };

    if word.ends_with("ss")
        || word.ends_with("us")
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        format!("{word}es")
    } else if word.ends_with("is") {
        format!("{}es", &word[..word.len() - 2])
    } else if word.ends_with('s') {
        word.to_string()
    } else if ends_with_consonant_then('y') {
        format!("{}ies", &word[..word.len() - 1])
    } else if word.ends_with("fe") && !word.ends_with("ffe") {
        format!("{}ves", &word[..word.len() - 2])
    } else if word.ends_with("lf") || word.ends_with("rf") {
        format!("{}ves", &word[..word.len() - 1])
    } else {
        format!("{word}s")
    }
}
