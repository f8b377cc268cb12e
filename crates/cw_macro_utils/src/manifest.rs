use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item};

const FACADE: &str = "cw_core";
const PREFIX: &str = "cw_";

/// The dependency names of the crate being compiled, as read from its
/// `Cargo.toml`.
///
/// Code emitted by `#[derive(Config)]` must name `cw_config` in a way that
/// resolves inside the invoking crate, which may depend on `cw_config`
/// directly or only on the `cw_core` facade.
///
/// # Example
///
/// ```rust
/// # use cw_macro_utils::Manifest;
/// let manifest = Manifest::parse("[dependencies]\ncw_core = \"0.0.1\"\n").unwrap();
/// let path = manifest.get_crate_path("cw_config");
/// assert!(path.leading_colon.is_some());
/// assert_eq!(path.segments[0].ident, "cw_core");
/// assert_eq!(path.segments[1].ident, "config");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    dependencies: Vec<String>,
    dev_dependencies: Vec<String>,
}

impl Manifest {
    /// Reads the dependency tables of a manifest. `None` if it is not TOML.
    pub fn parse(source: &str) -> Option<Self> {
        let document = Document::parse(source.to_owned()).ok()?;
        let names = |table: &str| match document.get(table) {
            Some(Item::Table(deps)) => deps.iter().map(|(name, _)| name.to_owned()).collect::<Vec<_>>(),
            _ => Vec::new(),
        };
        Some(Self {
            dependencies: names("dependencies"),
            dev_dependencies: names("dev-dependencies"),
        })
    }

    /// Path of the `cw_*` crate `name`.
    ///
    /// Regular dependencies are searched before dev-dependencies. In each, a
    /// direct dependency gives `::name` and the facade gives
    /// `::cw_core::short_name` (`cw_config` becomes `::cw_core::config`).
    /// Anything else falls back to `::name`, which a crate deriving on its
    /// own types satisfies with `extern crate self as name;`.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        let resolved = [&self.dependencies, &self.dev_dependencies]
            .into_iter()
            .find_map(|deps| Self::resolve(deps, name));
        resolved.unwrap_or_else(|| absolute(&[name]))
    }

    fn resolve(deps: &[String], name: &str) -> Option<syn::Path> {
        if deps.iter().any(|dep| dep == name) {
            return Some(absolute(&[name]));
        }
        let short = name.strip_prefix(PREFIX)?;
        deps.iter()
            .any(|dep| dep == FACADE)
            .then(|| absolute(&[FACADE, short]))
    }

    /// Runs `func` on the manifest of the crate being compiled.
    ///
    /// Manifests are cached per path until their modification time changes.
    /// An unreadable manifest behaves like one without dependencies.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static CACHE: RwLock<BTreeMap<PathBuf, (Option<SystemTime>, Manifest)>> =
            RwLock::new(BTreeMap::new());

        let Some(path) = env::var_os("CARGO_MANIFEST_DIR").map(|dir| PathBuf::from(dir).join("Cargo.toml"))
        else {
            return func(&Self::default());
        };
        let modified = fs::metadata(&path).and_then(|meta| meta.modified()).ok();

        {
            let cache = CACHE.read().unwrap_or_else(PoisonError::into_inner);
            if let Some((time, manifest)) = cache.get(&path)
                && modified.is_some()
                && *time == modified
            {
                return func(manifest);
            }
        }

        let manifest = fs::read_to_string(&path)
            .ok()
            .and_then(|source| Self::parse(&source))
            .unwrap_or_default();
        let result = func(&manifest);
        CACHE
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, (modified, manifest));
        result
    }
}

fn absolute(segments: &[&str]) -> syn::Path {
    let mut path = syn::Path {
        leading_colon: Some(Default::default()),
        segments: Default::default(),
    };
    for segment in segments {
        path.segments
            .push(syn::Ident::new(segment, proc_macro2::Span::call_site()).into());
    }
    path
}

#[cfg(test)]
mod tests {
    use super::Manifest;

    fn resolved(src: &str) -> String {
        let path = Manifest::parse(src).unwrap().get_crate_path("cw_config");
        path.segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    #[test]
    fn direct_dependency() {
        assert_eq!(resolved("[dependencies]\ncw_config = \"0.0.1\"\n"), "cw_config");
    }

    #[test]
    fn through_facade() {
        assert_eq!(resolved("[dev-dependencies]\ncw_core = { path = \"..\" }\n"), "cw_core::config");
    }

    #[test]
    fn dependencies_before_dev_dependencies() {
        let src = "[dependencies]\ncw_core = \"0.0.1\"\n[dev-dependencies]\ncw_config = \"0.0.1\"\n";
        assert_eq!(resolved(src), "cw_core::config");
    }

    #[test]
    fn fallback() {
        assert_eq!(resolved("[package]\nname = \"x\"\n"), "cw_config");
        assert!(Manifest::parse("not = [toml").is_none());
    }
}
