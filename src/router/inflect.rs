//! English pluralization for model display names.
//!
//! Only the last word of a CamelCase name is inflected (`BlogPost` → `BlogPosts`) and the
//! casing of the first letter is preserved (`Person` → `People`). Acronyms are treated as a
//! single word.

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
    "data",
    "metadata",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("ox", "oxen"),
    ("quiz", "quizzes"),
];

const F_TO_VES: &[&str] = &[
    "calf", "half", "knife", "leaf", "life", "loaf", "self", "shelf", "thief", "wife", "wolf",
];

const O_TO_OES: &[&str] = &["echo", "hero", "potato", "tomato", "veto"];

/// Greek and Latin endings whose trailing `is` becomes `es` (`analysis`, `axis`).
const IS_TO_ES: &[&str] = &["sis", "xis"];

/// Pluralize a model name.
#[must_use]
pub fn pluralize(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let split = last_word_start(name);
    let (head, word) = name.split_at(split);
    let mut out = String::with_capacity(name.len() + 3);
    out.push_str(head);
    out.push_str(&pluralize_word(word));
    out
}

fn last_word_start(name: &str) -> usize {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    chars
        .windows(2)
        .rev()
        .find(|pair| pair[0].1.is_lowercase() && pair[1].1.is_uppercase())
        .map_or(0, |pair| pair[1].0)
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }
    if F_TO_VES.contains(&lower.as_str()) {
        let stem = lower.trim_end_matches('e').trim_end_matches('f');
        return match_case(word, &format!("{stem}ves"));
    }
    if O_TO_OES.contains(&lower.as_str()) {
        return match_case(word, &format!("{lower}es"));
    }
    if IS_TO_ES.iter().any(|suffix| lower.ends_with(suffix)) {
        let stem = &lower[..lower.len() - 2];
        return match_case(word, &format!("{stem}es"));
    }
    if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        let stem = &lower[..lower.len() - 1];
        return match_case(word, &format!("{stem}ies"));
    }
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return match_case(word, &format!("{lower}es"));
    }
    match_case(word, &format!("{lower}s"))
}

fn ends_with_vowel_y(lower: &str) -> bool {
    let mut chars = lower.chars().rev();
    chars.next();
    matches!(chars.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

/// Re-apply the casing of `original` to the lowercase `plural`.
fn match_case(original: &str, plural: &str) -> String {
    if original.len() > 1 && original.chars().all(|c| !c.is_lowercase()) {
        return plural.to_uppercase();
    }
    let mut chars = plural.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(p)) if first.is_uppercase() => {
            p.to_uppercase().chain(chars).collect()
        }
        _ => plural.to_string(),
    }
}
