use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keymoji_core::matcher::{count_emoji, find_emoji_runs};
use keymoji_core::shortcode::{expand_shortcodes, name_of, shortcode_of};
use keymoji_core::{Renderer, Resolver, Settings, StyleRegistry};
use keymoji_types::{ParseOptions, Style, StyleKind};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Emoji asset resolver
///
/// Finds emoji in text and maps them to the image files of an installed
/// emoji style, or tells when the system font has to draw them.
#[derive(Parser, Debug)]
#[command(name = "keymoji")]
#[command(about = "Map emoji in text to local image assets", long_about = None)]
struct Args {
    /// Settings file (defaults to ./keymoji.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root of the emoji data, overrides the settings
    #[arg(long, global = true)]
    base_dir: Option<String>,

    /// Style key, e.g. twemoji or whatsapp
    #[arg(short, long, global = true)]
    style: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace emoji with image markup or asset paths
    Parse {
        text: String,
        /// Display size in pixels
        #[arg(long, default_value_t = 20.0)]
        size: f64,
        /// Do not enlarge inline glyphs
        #[arg(long)]
        no_grow: bool,
        /// Fixed raster size, 0 to compute it from --size
        #[arg(long, default_value_t = 0)]
        max_raster_size: u32,
        /// Emit bare paths instead of <img> markup
        #[arg(long)]
        url: bool,
        /// Drop emoji that cannot be replaced instead of keeping them
        #[arg(long)]
        no_plain: bool,
        /// Expand :shortcodes: before parsing
        #[arg(long)]
        shortcodes: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the emoji runs of a text
    Runs { text: String },
    /// Count emoji and remaining characters
    Count { text: String },
    /// Report which styles are installed
    Check {
        /// Probe again instead of trusting earlier results
        #[arg(long)]
        force: bool,
    },
    /// List the known styles
    Styles {
        /// Only styles of this kind (vector, raster, system or v/r/s)
        #[arg(long, value_parser = parse_kind)]
        kind: Option<StyleKind>,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keymoji=info,keymoji_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    if let Some(base_dir) = &args.base_dir {
        settings.base_dir = base_dir.clone();
    }
    let registry = settings.registry().context("Invalid style in settings")?;
    tracing::debug!("{} styles registered", registry.len());
    let resolver = Resolver::new(settings.resolver_options()?);

    match &args.command {
        Command::Parse {
            text,
            size,
            no_grow,
            max_raster_size,
            url,
            no_plain,
            shortcodes,
            json,
        } => {
            let style = selected_style(&registry, &args, &settings)?;
            let text = if *shortcodes {
                expand_shortcodes(text)
            } else {
                text.clone()
            };
            let options = ParseOptions {
                size: *size,
                no_grow: *no_grow,
                max_raster_size: *max_raster_size,
                include_plain: !*no_plain,
                as_markup: !*url,
            };

            let outcome = Renderer::new(resolver).parse(&text, &options, style);
            if *json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&outcome)
                        .context("Failed to serialize outcome")?
                );
            } else {
                println!("{}", outcome.text);
                eprintln!(
                    "{} emoji, {} other characters",
                    outcome.emoji_count, outcome.plain_count
                );
            }
        }
        Command::Runs { text } => {
            for run in find_emoji_runs(text) {
                println!(
                    "{:>5}  {:<40} {}  {:<24} {}",
                    run.start,
                    run.identifier,
                    run.raw,
                    shortcode_of(&run.raw)
                        .map(|code| format!(":{}:", code))
                        .unwrap_or_default(),
                    name_of(&run.raw).unwrap_or_default()
                );
            }
        }
        Command::Count { text } => {
            let count = count_emoji(text);
            println!("emoji: {}", count.emoji);
            println!("plain: {}", count.plain);
        }
        Command::Check { force } => {
            let styles: Vec<(String, Style)> = match &args.style {
                Some(key) => vec![(key.to_lowercase(), registry.require(key)?.clone())],
                None => registry
                    .iter()
                    .map(|(key, style)| (key.to_string(), style.clone()))
                    .collect(),
            };
            let mut unusable = Vec::new();
            for (key, style) in styles {
                let status = resolver.check_installed(&style, *force);
                println!("{:<12} {:>3}  {}", key, status.code(), status.as_str());
                if !status.is_usable() {
                    unusable.push(key);
                }
            }
            // a named style that cannot be drawn fails the command
            if args.style.is_some() && !unusable.is_empty() {
                anyhow::bail!("Style {} is not installed", unusable.join(", "));
            }
        }
        Command::Styles { kind } => {
            for (key, style) in registry
                .iter()
                .filter(|(_, style)| kind.map_or(true, |kind| style.kind == kind))
            {
                let marker = if key == settings.default_style.to_lowercase() {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {:<12} {:<10} {:<8} {} ({})",
                    marker,
                    key,
                    style.name,
                    style.kind.as_str(),
                    style.dir,
                    style.ext
                );
            }
        }
    }

    Ok(())
}

fn selected_style<'r>(
    registry: &'r StyleRegistry,
    args: &Args,
    settings: &Settings,
) -> Result<&'r Style> {
    let key = args.style.as_deref().unwrap_or(settings.default_style.as_str());
    registry
        .require(key)
        .with_context(|| format!("Style {} is not registered", key))
}

fn parse_kind(value: &str) -> std::result::Result<StyleKind, String> {
    StyleKind::parse(value).ok_or_else(|| format!("unknown style kind {:?}", value))
}
