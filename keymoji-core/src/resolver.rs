use std::sync::Arc;

use keymoji_types::{InstallStatus, Resolution, SizeRequest, Style, StyleKind};

use crate::cache::{ResolverCache, SizeEntry, SizeKey};
use crate::ladder::RasterLadder;
use crate::probe::{AssetProbe, DefaultProbe};

/// Inline glyphs look smaller than the surrounding text at the same size
pub const DEFAULT_GROWTH_FACTOR: f64 = 1.15;
pub const DEFAULT_SUB_DIR: &str = "sailor-emoji";
/// U+2764 HEAVY BLACK HEART, present in every complete set
pub const DEFAULT_PROBE_GLYPH: &str = "2764";

/// Fixed inputs of a [`Resolver`]
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Root of all emoji data, a path or a URL
    pub base_dir: String,
    pub sub_dir: String,
    pub ladder: RasterLadder,
    pub growth_factor: f64,
    /// Identifier of the glyph fetched to check a style directory
    pub probe_glyph: String,
}

impl ResolverOptions {
    pub fn new(base_dir: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            sub_dir: DEFAULT_SUB_DIR.to_string(),
            ladder: RasterLadder::default(),
            growth_factor: DEFAULT_GROWTH_FACTOR,
            probe_glyph: DEFAULT_PROBE_GLYPH.to_string(),
        }
    }
}

/// Maps a style and a display size to the directory holding its glyphs
///
/// Size decisions and directory probes are cached in a [`ResolverCache`];
/// a directory is probed at most once unless a re-check is forced.
#[derive(Clone)]
pub struct Resolver {
    options: ResolverOptions,
    cache: ResolverCache,
    probe: Arc<dyn AssetProbe>,
}

impl Resolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self::with_probe(options, Arc::new(DefaultProbe::new()))
    }

    pub fn with_probe(options: ResolverOptions, probe: Arc<dyn AssetProbe>) -> Self {
        Self {
            options,
            cache: ResolverCache::new(),
            probe,
        }
    }

    /// Use `cache` instead of a private one, e.g. to share it between resolvers
    ///
    /// Size entries are keyed by style root and ladder, so resolvers with
    /// other base directories or ladders never see each other's decisions.
    pub fn with_cache(mut self, cache: ResolverCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn cache(&self) -> &ResolverCache {
        &self.cache
    }

    /// Requested size after the growth factor, rounded
    pub fn effective_size(&self, request: &SizeRequest) -> u32 {
        let scaled = if request.no_grow {
            request.size
        } else {
            self.options.growth_factor * request.size
        };
        // saturating cast, NaN and negatives become 0
        scaled.round() as u32
    }

    /// Resolve where the glyphs of `style` for `request` live
    ///
    /// Never fails: an unusable style comes back with `use_system` set.
    pub fn resolve(&self, style: &Style, request: &SizeRequest, force: bool) -> Resolution {
        let effective = self.effective_size(request);

        if style.is_system() {
            return Resolution::system(effective);
        }
        if !style.is_well_formed() {
            tracing::warn!("Style {:?} has no asset directory or extension", style.name);
            return Resolution::system(effective);
        }

        let (style_path, effective_size) = match style.kind {
            StyleKind::Raster => {
                let effective = if request.max_raster_size > 0 {
                    request.max_raster_size
                } else {
                    effective
                };
                let entry = self.raster_entry(style, effective, force);
                (entry.path, entry.effective)
            }
            StyleKind::Vector => (self.style_root(style), effective),
            StyleKind::System => return Resolution::system(effective),
        };

        let available = self.check_style(&style_path, style, force);
        Resolution {
            use_system: !available,
            style_path,
            effective_size,
        }
    }

    fn raster_entry(&self, style: &Style, effective: u32, force: bool) -> SizeEntry {
        let root = self.style_root(style);
        // keyed by the size before clamping
        let key = SizeKey::new(root.as_str(), self.options.ladder.sizes(), effective);
        if !force {
            if let Some(entry) = self.cache.size(&key) {
                return entry;
            }
        }

        let choice = self.options.ladder.select(effective);
        let entry = SizeEntry {
            source: choice.source,
            effective: choice.effective,
            path: format!("{}/{}", root, choice.source),
        };
        tracing::debug!(
            "Raster size {} for {:?}: source {}, effective {}",
            effective,
            style.name,
            entry.source,
            entry.effective
        );
        self.cache.store_size(key, entry.clone());
        entry
    }

    fn style_root(&self, style: &Style) -> String {
        let mut path = self.options.base_dir.trim_end_matches('/').to_string();
        for segment in [self.options.sub_dir.as_str(), style.dir.as_str()] {
            let segment = segment.trim_matches('/');
            if !segment.is_empty() {
                path.push('/');
                path.push_str(segment);
            }
        }
        path
    }

    /// Whether the directory at `path` holds assets of `style`
    ///
    /// Only the probe glyph is fetched; a set missing other glyphs still
    /// counts as available.
    pub fn check_style(&self, path: &str, style: &Style, force: bool) -> bool {
        if !force {
            if let Some(available) = self.cache.availability(path) {
                return available;
            }
        }

        let location = format!("{}/{}.{}", path, self.options.probe_glyph, style.ext);
        let available = match self.probe.fetch(&location) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to load emoji style at {}: {}", location, e);
                false
            }
        };
        self.cache.store_availability(path, available);
        available
    }

    /// How much of `style` is installed
    ///
    /// Raster styles are checked once per ladder size.
    pub fn check_installed(&self, style: &Style, force: bool) -> InstallStatus {
        match style.kind {
            StyleKind::System => InstallStatus::Installed,
            StyleKind::Raster => {
                let ladder = &self.options.ladder;
                let missing = ladder
                    .sizes()
                    .iter()
                    .filter(|&&size| {
                        self.resolve(style, &SizeRequest::exact(size), force)
                            .use_system
                    })
                    .count();

                if missing == ladder.len() {
                    InstallStatus::NotInstalled
                } else if missing == 0 {
                    InstallStatus::Installed
                } else {
                    InstallStatus::Partial { missing }
                }
            }
            StyleKind::Vector => {
                let request = SizeRequest::exact(self.options.ladder.largest());
                if self.resolve(style, &request, force).use_system {
                    InstallStatus::NotInstalled
                } else {
                    InstallStatus::Installed
                }
            }
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("options", &self.options)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeError;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers from a fixed set of locations and counts every fetch
    struct FakeProbe {
        present: HashSet<String>,
        fetches: AtomicUsize,
    }

    impl FakeProbe {
        fn new(present: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                present: present.iter().map(|s| s.to_string()).collect(),
                fetches: AtomicUsize::new(0),
            })
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl AssetProbe for FakeProbe {
        fn fetch(&self, location: &str) -> Result<(), ProbeError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.present.contains(location) {
                Ok(())
            } else {
                Err(ProbeError::NotAFile(location.to_string()))
            }
        }
    }

    fn twemoji() -> Style {
        Style::new("Twemoji", "twemoji/13.0.1", "svg", StyleKind::Vector)
    }

    fn whatsapp() -> Style {
        Style::new("Whatsapp", "whatsapp/2.20.206.24", "png", StyleKind::Raster)
    }

    fn resolver(probe: Arc<FakeProbe>) -> Resolver {
        Resolver::with_probe(ResolverOptions::new("/data"), probe)
    }

    #[test]
    fn test_system_style_never_probes() {
        let probe = FakeProbe::new(&[]);
        let resolver = resolver(probe.clone());

        let resolution = resolver.resolve(&Style::system(), &SizeRequest::new(20.0), false);
        assert!(resolution.use_system);
        assert_eq!(resolution.style_path, "");
        assert_eq!(resolution.effective_size, 23);
        assert_eq!(probe.fetches(), 0);
    }

    #[test]
    fn test_vector_style_path_and_growth() {
        let probe = FakeProbe::new(&["/data/sailor-emoji/twemoji/13.0.1/2764.svg"]);
        let resolver = resolver(probe);

        let grown = resolver.resolve(&twemoji(), &SizeRequest::new(60.0), false);
        assert!(!grown.use_system);
        assert_eq!(grown.style_path, "/data/sailor-emoji/twemoji/13.0.1");
        assert_eq!(grown.effective_size, 69);

        let mut request = SizeRequest::new(60.0);
        request.no_grow = true;
        assert_eq!(resolver.resolve(&twemoji(), &request, false).effective_size, 60);

        // the raster override does not apply to vector styles
        request.max_raster_size = 144;
        assert_eq!(resolver.resolve(&twemoji(), &request, false).effective_size, 60);
    }

    #[test]
    fn test_raster_style_picks_source_size() {
        let probe = FakeProbe::new(&[
            "/data/sailor-emoji/whatsapp/2.20.206.24/72/2764.png",
            "/data/sailor-emoji/whatsapp/2.20.206.24/144/2764.png",
        ]);
        let resolver = resolver(probe);

        let resolution = resolver.resolve(&whatsapp(), &SizeRequest::new(60.0), false);
        assert!(!resolution.use_system);
        assert_eq!(resolution.style_path, "/data/sailor-emoji/whatsapp/2.20.206.24/72");
        assert_eq!(resolution.effective_size, 69);

        let huge = resolver.resolve(&whatsapp(), &SizeRequest::new(400.0), false);
        assert_eq!(huge.style_path, "/data/sailor-emoji/whatsapp/2.20.206.24/144");
        assert_eq!(huge.effective_size, 144);
    }

    #[test]
    fn test_max_raster_size_overrides_request() {
        let probe = FakeProbe::new(&["/data/sailor-emoji/whatsapp/2.20.206.24/144/2764.png"]);
        let resolver = resolver(probe);

        let mut request = SizeRequest::new(20.0);
        request.max_raster_size = 144;
        let resolution = resolver.resolve(&whatsapp(), &request, false);
        assert_eq!(resolution.style_path, "/data/sailor-emoji/whatsapp/2.20.206.24/144");
        assert_eq!(resolution.effective_size, 144);
    }

    #[test]
    fn test_missing_size_falls_back_to_system() {
        let probe = FakeProbe::new(&["/data/sailor-emoji/whatsapp/2.20.206.24/144/2764.png"]);
        let resolver = resolver(probe);

        let resolution = resolver.resolve(&whatsapp(), &SizeRequest::new(60.0), false);
        assert!(resolution.use_system);
        assert_eq!(resolution.style_path, "/data/sailor-emoji/whatsapp/2.20.206.24/72");
    }

    #[test]
    fn test_resolution_is_idempotent_and_probes_once() {
        let probe = FakeProbe::new(&["/data/sailor-emoji/twemoji/13.0.1/2764.svg"]);
        let resolver = resolver(probe.clone());

        let first = resolver.resolve(&twemoji(), &SizeRequest::new(32.0), false);
        let second = resolver.resolve(&twemoji(), &SizeRequest::new(32.0), false);
        assert_eq!(first, second);
        assert_eq!(probe.fetches(), 1);

        // failures are cached too
        let missing = Style::new("OpenMoji", "openmoji/13.0.0", "svg", StyleKind::Vector);
        assert!(resolver.resolve(&missing, &SizeRequest::new(32.0), false).use_system);
        assert!(resolver.resolve(&missing, &SizeRequest::new(32.0), false).use_system);
        assert_eq!(probe.fetches(), 2);
    }

    #[test]
    fn test_force_rechecks() {
        let probe = FakeProbe::new(&["/data/sailor-emoji/twemoji/13.0.1/2764.svg"]);
        let resolver = resolver(probe.clone());

        resolver.resolve(&twemoji(), &SizeRequest::new(32.0), false);
        resolver.resolve(&twemoji(), &SizeRequest::new(32.0), true);
        assert_eq!(probe.fetches(), 2);
    }

    #[test]
    fn test_malformed_style_uses_system() {
        let probe = FakeProbe::new(&[]);
        let resolver = resolver(probe.clone());

        let broken = Style::new("Broken", "", "png", StyleKind::Raster);
        let resolution = resolver.resolve(&broken, &SizeRequest::new(32.0), false);
        assert!(resolution.use_system);
        assert_eq!(probe.fetches(), 0);
        assert_eq!(resolver.check_installed(&broken, false), InstallStatus::NotInstalled);
    }

    #[test]
    fn test_same_directory_shares_availability() {
        let probe = FakeProbe::new(&["/data/sailor-emoji/twemoji/13.0.1/2764.svg"]);
        let resolver = resolver(probe.clone());

        let alias = Style::new("Twitter", "twemoji/13.0.1", "svg", StyleKind::Vector);
        resolver.resolve(&twemoji(), &SizeRequest::new(32.0), false);
        assert!(!resolver.resolve(&alias, &SizeRequest::new(32.0), false).use_system);
        assert_eq!(probe.fetches(), 1);
    }

    #[test]
    fn test_raster_sizes_are_cached_per_style() {
        let probe = FakeProbe::new(&[]);
        let resolver = resolver(probe);

        let noto = Style::new("Noto", "noto/15.0", "png", StyleKind::Raster);
        let a = resolver.resolve(&whatsapp(), &SizeRequest::new(60.0), false);
        let b = resolver.resolve(&noto, &SizeRequest::new(60.0), false);
        assert_eq!(b.style_path, "/data/sailor-emoji/noto/15.0/72");
        assert_ne!(a.style_path, b.style_path);
        assert_eq!(resolver.cache().len().0, 2);
    }

    #[test]
    fn test_check_installed_never_installed() {
        let probe = FakeProbe::new(&[]);
        let resolver = resolver(probe);

        assert_eq!(resolver.check_installed(&whatsapp(), false), InstallStatus::NotInstalled);
        assert_eq!(resolver.check_installed(&whatsapp(), false).code(), -1);
        assert_eq!(resolver.check_installed(&twemoji(), false).code(), -1);
    }

    #[test]
    fn test_check_installed_partial_and_full() {
        let probe = FakeProbe::new(&[
            "/data/sailor-emoji/whatsapp/2.20.206.24/72/2764.png",
            "/data/sailor-emoji/twemoji/13.0.1/2764.svg",
        ]);
        let resolver = resolver(probe);

        assert_eq!(
            resolver.check_installed(&whatsapp(), false),
            InstallStatus::Partial { missing: 2 }
        );
        assert_eq!(resolver.check_installed(&twemoji(), false), InstallStatus::Installed);
        assert_eq!(resolver.check_installed(&Style::system(), false), InstallStatus::Installed);
    }

    #[test]
    fn test_base_dir_trailing_slash() {
        let probe = FakeProbe::new(&[]);
        let resolver = Resolver::with_probe(ResolverOptions::new("file:///data/"), probe);

        let resolution = resolver.resolve(&twemoji(), &SizeRequest::new(10.0), false);
        assert_eq!(resolution.style_path, "file:///data/sailor-emoji/twemoji/13.0.1");
    }

    proptest! {
        #[test]
        fn prop_raster_source_is_on_ladder(size in 1.0f64..300.0, no_grow in any::<bool>()) {
            let probe = FakeProbe::new(&[]);
            let resolver = resolver(probe);
            let mut request = SizeRequest::new(size);
            request.no_grow = no_grow;

            let resolution = resolver.resolve(&whatsapp(), &request, false);
            let source: u32 = resolution
                .style_path
                .rsplit('/')
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap();
            prop_assert!(resolver.options().ladder.sizes().contains(&source));
            prop_assert!(resolution.effective_size <= source);
        }
    }
}
