use keymoji_types::{EmojiCount, EmojiMatch};
use once_cell::sync::Lazy;
use regex::Regex;

/// Version of the bundled sequence table
pub const TABLE_VERSION: &str = "twemoji-13.0.1";

const SEQUENCE_TABLE: &str = include_str!("../data/twemoji-13.0.1.txt");

/// Emoji presentation selector, VS16
pub const VS16: char = '\u{FE0F}';
/// Zero width joiner
pub const ZWJ: char = '\u{200D}';

/// Compiled sequence table
///
/// Alternatives are tried in table order, so composite sequences win over
/// the single code points they start with.
static EMOJI_REGEX: Lazy<Regex> = Lazy::new(|| {
    compile_table(SEQUENCE_TABLE).expect("Failed to compile emoji sequence table")
});

/// Join the table lines into one alternation, skipping comments and blanks
pub fn compile_table(table: &str) -> Result<Regex, regex::Error> {
    let pattern = table
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !line.starts_with("# ") && *line != "#")
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&pattern)
}

/// Iterator over the emoji runs of a text, in order
///
/// Created by [`find_emoji_runs`]. Each call to `find_emoji_runs` scans the
/// text again from the start.
#[derive(Debug, Clone)]
pub struct EmojiRuns<'t> {
    text: &'t str,
    pos: usize,
}

impl Iterator for EmojiRuns<'_> {
    type Item = EmojiMatch;

    fn next(&mut self) -> Option<EmojiMatch> {
        while self.pos < self.text.len() {
            let caps = EMOJI_REGEX.captures_at(self.text, self.pos)?;
            let whole = caps.get(0)?;

            // A captured U+FE0E asks for text presentation: not an emoji here.
            if caps.iter().skip(1).any(|group| group.is_some()) {
                let step = self.text[whole.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.pos = whole.start() + step;
                continue;
            }

            self.pos = whole.end();
            return Some(EmojiMatch {
                identifier: icon_id(whole.as_str()),
                raw: whole.as_str().to_string(),
                start: whole.start(),
            });
        }
        None
    }
}

/// Find all emoji runs in `text`
///
/// # Examples
///
/// ```
/// use keymoji_core::matcher::find_emoji_runs;
/// let runs: Vec<_> = find_emoji_runs("Hi 😀! 👍🏽").collect();
/// assert_eq!(runs.len(), 2);
/// assert_eq!(runs[0].identifier, "1f600");
/// assert_eq!(runs[1].identifier, "1f44d-1f3fd");
/// ```
pub fn find_emoji_runs(text: &str) -> EmojiRuns<'_> {
    EmojiRuns { text, pos: 0 }
}

/// Identifier used as the asset file stem for a matched run
///
/// VS16 is dropped unless the run is a ZWJ sequence, whose asset names keep
/// their selectors.
pub fn icon_id(raw: &str) -> String {
    if raw.contains(ZWJ) {
        to_code_point(raw, "-")
    } else {
        let stripped: String = raw.chars().filter(|&c| c != VS16).collect();
        to_code_point(&stripped, "-")
    }
}

/// Lowercase hex scalar values of `text`, joined by `sep`
pub fn to_code_point(text: &str, sep: &str) -> String {
    text.chars()
        .map(|c| format!("{:x}", u32::from(c)))
        .collect::<Vec<_>>()
        .join(sep)
}

/// Same as [`to_code_point`] for UTF-16 input
///
/// Surrogate pairs are combined; an unpaired surrogate is written as its
/// own unit value.
pub fn to_code_point_utf16(units: &[u16], sep: &str) -> String {
    char::decode_utf16(units.iter().copied())
        .map(|decoded| match decoded {
            Ok(c) => format!("{:x}", u32::from(c)),
            Err(err) => format!("{:x}", err.unpaired_surrogate()),
        })
        .collect::<Vec<_>>()
        .join(sep)
}

/// Remove every emoji run from `text`
pub fn strip_emoji(text: &str) -> String {
    let mut rest = String::with_capacity(text.len());
    let mut last = 0;
    for run in find_emoji_runs(text) {
        rest.push_str(&text[last..run.start]);
        last = run.end();
    }
    rest.push_str(&text[last..]);
    rest
}

/// Count emoji runs and the characters left around them
pub fn count_emoji(text: &str) -> EmojiCount {
    EmojiCount {
        emoji: find_emoji_runs(text).count(),
        plain: strip_emoji(text).chars().count(),
    }
}
