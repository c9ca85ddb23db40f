use keymoji_types::{EmojiCount, ParseOptions, ParseOutcome, Resolution, Style};

use crate::matcher::{count_emoji, find_emoji_runs, strip_emoji};
use crate::resolver::Resolver;

/// Replaces emoji runs in text with asset references
#[derive(Debug, Clone)]
pub struct Renderer {
    resolver: Resolver,
}

impl Renderer {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Replace every emoji run of `text` according to `options`
    ///
    /// Runs are counted whether or not they end up as images. With a style
    /// that is not installed the text keeps its emoji (or loses them when
    /// `include_plain` is off) and the system font draws them.
    ///
    /// # Examples
    ///
    /// ```
    /// use keymoji_core::{Renderer, Resolver, ResolverOptions};
    /// use keymoji_types::{ParseOptions, Style};
    ///
    /// let renderer = Renderer::new(Resolver::new(ResolverOptions::new("/data")));
    /// let outcome = renderer.parse("Hi 😀!", &ParseOptions::markup(20.0), &Style::system());
    /// assert_eq!(outcome.text, "Hi 😀!");
    /// assert_eq!(outcome.emoji_count, 1);
    /// assert_eq!(outcome.plain_count, 4);
    /// ```
    pub fn parse(&self, text: &str, options: &ParseOptions, style: &Style) -> ParseOutcome {
        let resolution = self
            .resolver
            .resolve(style, &options.size_request(), false);

        let mut out = String::with_capacity(text.len());
        let mut emoji_count = 0;
        let mut last = 0;

        for run in find_emoji_runs(text) {
            out.push_str(&text[last..run.start]);
            last = run.end();
            emoji_count += 1;

            if resolution.use_system || run.identifier.is_empty() {
                if options.include_plain {
                    out.push_str(&run.raw);
                } else if !options.as_markup {
                    out.push_str(&run.identifier);
                }
                continue;
            }

            let src = asset_path(&resolution, &run.identifier, &style.ext);
            if options.as_markup {
                out.push_str(&img_tag(&src, resolution.effective_size));
            } else {
                out.push_str(&src);
            }
        }
        out.push_str(&text[last..]);

        ParseOutcome {
            emoji_count,
            plain_count: strip_emoji(text).chars().count(),
            text: out,
        }
    }

    /// Inline `<img>` markup, keeping emoji the style cannot draw
    pub fn parse_as_markup(
        &self,
        text: &str,
        size: f64,
        style: &Style,
        no_grow: bool,
        max_raster_size: u32,
    ) -> ParseOutcome {
        let options = ParseOptions {
            no_grow,
            max_raster_size,
            ..ParseOptions::markup(size)
        };
        self.parse(text, &options, style)
    }

    /// Bare asset paths, identifiers for emoji the style cannot draw
    pub fn parse_single_url(
        &self,
        text: &str,
        size: f64,
        style: &Style,
        no_grow: bool,
        max_raster_size: u32,
    ) -> ParseOutcome {
        let options = ParseOptions {
            no_grow,
            max_raster_size,
            ..ParseOptions::single_url(size)
        };
        self.parse(text, &options, style)
    }

    pub fn count(&self, text: &str) -> EmojiCount {
        count_emoji(text)
    }
}

/// `<style_path>/<identifier>.<ext>`
pub fn asset_path(resolution: &Resolution, identifier: &str, ext: &str) -> String {
    format!("{}/{}.{}", resolution.style_path, identifier, ext)
}

pub fn img_tag(src: &str, size: u32) -> String {
    format!(
        r#"<img src="{}" align="middle" width="{}" height="{}"/>"#,
        src, size, size
    )
}
