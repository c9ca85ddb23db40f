//! Shortcode helpers, e.g. `:heart:` to ❤️
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static SHORTCODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":([a-z0-9_+\-]{1,32}):").expect("Failed to compile shortcode regex")
});

/// Replace known shortcodes with their emoji
///
/// Unknown shortcodes are left as they are.
///
/// # Examples
///
/// ```
/// use keymoji_core::shortcode::expand_shortcodes;
/// assert_eq!(expand_shortcodes("Hello :smile:"), "Hello 😄");
/// assert_eq!(expand_shortcodes(":not_an_emoji:"), ":not_an_emoji:");
/// ```
pub fn expand_shortcodes(text: &str) -> String {
    SHORTCODE_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            match emojis::get_by_shortcode(&caps[1]) {
                Some(emoji) => emoji.as_str().to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Primary shortcode of a matched run, if it has one
pub fn shortcode_of(raw: &str) -> Option<&'static str> {
    emojis::get(raw).and_then(|emoji| emoji.shortcode())
}

/// Human readable name of a matched run
pub fn name_of(raw: &str) -> Option<&'static str> {
    emojis::get(raw).map(|emoji| emoji.name())
}
