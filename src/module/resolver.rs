//! Module specifier resolution.
//!
//! Specifiers are resolved in this order:
//! 1. Relative (`./`, `../`) and absolute paths against the referring module
//! 2. `compilerOptions.paths` patterns
//! 3. `compilerOptions.baseUrl`
//! 4. `node_modules` directories walking up from the referrer, including
//!    `@types` packages

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use super::fs::{normalize_path, FileSystem};
use super::tsconfig::CompilerOptions;
use super::ModuleId;

const TS_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".d.ts"];
const JS_EXTENSIONS: &[&str] = &[".js", ".jsx"];

/// Settings that control how specifiers map onto files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolverConfig {
    pub base_url: Option<PathBuf>,
    pub paths: IndexMap<String, Vec<String>>,
    /// Directory `paths` substitutions are relative to when `base_url` is unset.
    pub paths_base: Option<PathBuf>,
    pub allow_js: bool,
}

impl From<CompilerOptions> for ResolverConfig {
    fn from(options: CompilerOptions) -> Self {
        ResolverConfig {
            base_url: options.base_url,
            paths: options.paths,
            paths_base: options.paths_base,
            allow_js: options.allow_js,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    types: Option<String>,
    typings: Option<String>,
    main: Option<String>,
}

/// Resolves specifiers against a file system.
pub struct Resolver<'a, F: FileSystem> {
    fs: &'a F,
    config: &'a ResolverConfig,
}

impl<'a, F: FileSystem> Resolver<'a, F> {
    pub fn new(fs: &'a F, config: &'a ResolverConfig) -> Self {
        Resolver { fs, config }
    }

    /// Resolve `specifier` as written in the module `from`.
    pub fn resolve(&self, specifier: &str, from: &ModuleId) -> Option<ModuleId> {
        if specifier.is_empty() {
            return None;
        }

        if is_relative(specifier) || Path::new(specifier).is_absolute() {
            return self.load_file_or_directory(&from.dir().join(specifier));
        }

        if let Some(found) = self.resolve_paths(specifier) {
            return Some(found);
        }

        if let Some(base_url) = &self.config.base_url {
            if let Some(found) = self.load_file_or_directory(&base_url.join(specifier)) {
                return Some(found);
            }
        }

        self.resolve_node_modules(specifier, from.dir())
    }

    /// Apply `paths` patterns. An exact pattern beats wildcards; among
    /// wildcards the longest prefix wins.
    fn resolve_paths(&self, specifier: &str) -> Option<ModuleId> {
        let base = self
            .config
            .base_url
            .as_ref()
            .or(self.config.paths_base.as_ref())?;

        let mut best: Option<(usize, &str, &Vec<String>)> = None;
        for (pattern, targets) in &self.config.paths {
            match pattern.split_once('*') {
                None if pattern == specifier => {
                    best = Some((usize::MAX, "", targets));
                    break;
                }
                None => {}
                Some((prefix, suffix)) => {
                    let matches = specifier.len() >= prefix.len() + suffix.len()
                        && specifier.starts_with(prefix)
                        && specifier.ends_with(suffix);
                    if matches && best.map_or(true, |(len, _, _)| prefix.len() > len) {
                        let captured = &specifier[prefix.len()..specifier.len() - suffix.len()];
                        best = Some((prefix.len(), captured, targets));
                    }
                }
            }
        }

        let (_, captured, targets) = best?;
        targets.iter().find_map(|target| {
            let substituted = target.replacen('*', captured, 1);
            self.load_file_or_directory(&base.join(substituted))
        })
    }

    fn resolve_node_modules(&self, specifier: &str, from_dir: &Path) -> Option<ModuleId> {
        let (package, subpath) = split_package_name(specifier);
        let types_package = format!("@types/{}", types_package_name(package));

        for dir in from_dir.ancestors() {
            if dir.file_name().is_some_and(|name| name == "node_modules") {
                continue;
            }
            let node_modules = dir.join("node_modules");
            if !self.fs.is_dir(&node_modules) {
                continue;
            }

            if let Some(found) = self.load_file_or_directory(&node_modules.join(specifier)) {
                return Some(found);
            }

            let mut types_path = node_modules.join(&types_package);
            if !subpath.is_empty() {
                types_path = types_path.join(subpath);
            }
            if let Some(found) = self.load_file_or_directory(&types_path) {
                return Some(found);
            }
        }
        None
    }

    fn load_file_or_directory(&self, path: &Path) -> Option<ModuleId> {
        let path = normalize_path(path);
        self.load_file(&path)
            .or_else(|| self.load_directory(&path))
            .map(ModuleId::new)
    }

    fn load_file(&self, path: &Path) -> Option<PathBuf> {
        let text = path.to_string_lossy();

        if self.fs.is_file(path) && self.has_source_extension(&text) {
            return Some(path.to_path_buf());
        }

        // `./util.js` written in a TypeScript source refers to `./util.ts`
        for (js, replacements) in JS_TO_TS {
            if let Some(stem) = text.strip_suffix(js) {
                let mapped = replacements
                    .iter()
                    .map(|ext| PathBuf::from(format!("{}{}", stem, ext)))
                    .find(|candidate| self.fs.is_file(candidate));
                if mapped.is_some() {
                    return mapped;
                }
            }
        }

        self.extensions()
            .map(|ext| PathBuf::from(format!("{}{}", text, ext)))
            .find(|candidate| self.fs.is_file(candidate))
    }

    fn load_directory(&self, dir: &Path) -> Option<PathBuf> {
        if !self.fs.is_dir(dir) {
            return None;
        }

        if let Some(entry) = self.package_entry(dir) {
            let entry = normalize_path(&dir.join(entry));
            if let Some(found) = self.load_file(&entry).or_else(|| self.load_index(&entry)) {
                return Some(found);
            }
        }

        self.load_index(dir)
    }

    fn load_index(&self, dir: &Path) -> Option<PathBuf> {
        self.extensions()
            .map(|ext| dir.join(format!("index{}", ext)))
            .find(|candidate| self.fs.is_file(candidate))
    }

    /// The `types`, `typings` or `main` field of `dir/package.json`.
    fn package_entry(&self, dir: &Path) -> Option<String> {
        let manifest = dir.join("package.json");
        let text = self.fs.read_to_string(&manifest).ok()?;
        let package: PackageJson = match serde_json::from_str(&text) {
            Ok(package) => package,
            Err(err) => {
                tracing::debug!(
                    path = %manifest.display(),
                    error = %err,
                    "ignoring invalid package.json"
                );
                return None;
            }
        };
        package.types.or(package.typings).or(package.main)
    }

    fn extensions(&self) -> impl Iterator<Item = &'static str> {
        let js: &'static [&'static str] = if self.config.allow_js {
            JS_EXTENSIONS
        } else {
            &[]
        };
        TS_EXTENSIONS.iter().chain(js.iter()).copied()
    }

    fn has_source_extension(&self, path: &str) -> bool {
        const TS_SOURCES: &[&str] = &[".ts", ".tsx", ".mts", ".cts"];
        const JS_SOURCES: &[&str] = &[".js", ".jsx", ".mjs", ".cjs"];
        TS_SOURCES.iter().any(|ext| path.ends_with(ext))
            || (self.config.allow_js && JS_SOURCES.iter().any(|ext| path.ends_with(ext)))
    }
}

/// JavaScript extensions and the TypeScript files that stand in for them.
const JS_TO_TS: &[(&str, &[&str])] = &[
    (".js", &[".ts", ".tsx", ".d.ts"]),
    (".jsx", &[".tsx"]),
    (".mjs", &[".mts", ".d.mts"]),
    (".cjs", &[".cts", ".d.cts"]),
];

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Split `@scope/pkg/sub/path` into (`@scope/pkg`, `sub/path`).
fn split_package_name(specifier: &str) -> (&str, &str) {
    let segments = if specifier.starts_with('@') { 2 } else { 1 };
    let mut end = 0;
    for (count, (index, _)) in specifier.match_indices('/').enumerate() {
        if count + 1 == segments {
            end = index;
            break;
        }
    }
    if end == 0 {
        (specifier, "")
    } else {
        (&specifier[..end], &specifier[end + 1..])
    }
}

/// `@scope/pkg` is published under `@types/scope__pkg`.
fn types_package_name(package: &str) -> String {
    match package.strip_prefix('@') {
        Some(scoped) => scoped.replacen('/', "__", 1),
        None => package.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::MemoryFs;
    use pretty_assertions::assert_eq;

    fn from() -> ModuleId {
        ModuleId::new("/proj/src/index.ts")
    }

    fn resolve(fs: &MemoryFs, config: &ResolverConfig, specifier: &str) -> Option<String> {
        Resolver::new(fs, config)
            .resolve(specifier, &from())
            .map(|id| id.to_string())
    }

    #[test]
    fn test_relative_extension_probing() {
        let fs = MemoryFs::new()
            .with_file("/proj/src/a.ts", "")
            .with_file("/proj/src/b.tsx", "")
            .with_file("/proj/src/c.d.ts", "")
            .with_file("/proj/src/app.module.ts", "")
            .with_file("/proj/lib/d.ts", "");
        let config = ResolverConfig::default();

        assert_eq!(resolve(&fs, &config, "./a"), Some("/proj/src/a.ts".into()));
        assert_eq!(resolve(&fs, &config, "./a.ts"), Some("/proj/src/a.ts".into()));
        assert_eq!(resolve(&fs, &config, "./b"), Some("/proj/src/b.tsx".into()));
        assert_eq!(resolve(&fs, &config, "./c"), Some("/proj/src/c.d.ts".into()));
        assert_eq!(
            resolve(&fs, &config, "./app.module"),
            Some("/proj/src/app.module.ts".into())
        );
        assert_eq!(resolve(&fs, &config, "../lib/d"), Some("/proj/lib/d.ts".into()));
        assert_eq!(resolve(&fs, &config, "./missing"), None);
    }

    #[test]
    fn test_index_files_and_package_types() {
        let fs = MemoryFs::new()
            .with_file("/proj/src/barrel/index.ts", "")
            .with_file("/proj/src/pkg/package.json", r#"{ "types": "./dist/main.d.ts" }"#)
            .with_file("/proj/src/pkg/dist/main.d.ts", "");
        let config = ResolverConfig::default();

        assert_eq!(
            resolve(&fs, &config, "./barrel"),
            Some("/proj/src/barrel/index.ts".into())
        );
        assert_eq!(
            resolve(&fs, &config, "./pkg"),
            Some("/proj/src/pkg/dist/main.d.ts".into())
        );
    }

    #[test]
    fn test_js_specifier_maps_to_ts_source() {
        let fs = MemoryFs::new()
            .with_file("/proj/src/util.ts", "")
            .with_file("/proj/src/view.tsx", "")
            .with_file("/proj/src/plain.js", "");
        let config = ResolverConfig::default();

        assert_eq!(resolve(&fs, &config, "./util.js"), Some("/proj/src/util.ts".into()));
        assert_eq!(resolve(&fs, &config, "./view.jsx"), Some("/proj/src/view.tsx".into()));
        assert_eq!(resolve(&fs, &config, "./plain"), None);

        let allow_js = ResolverConfig {
            allow_js: true,
            ..ResolverConfig::default()
        };
        assert_eq!(resolve(&fs, &allow_js, "./plain"), Some("/proj/src/plain.js".into()));
        assert_eq!(resolve(&fs, &allow_js, "./plain.js"), Some("/proj/src/plain.js".into()));
    }

    #[test]
    fn test_paths_and_base_url() {
        let fs = MemoryFs::new()
            .with_file("/proj/src/app/core/index.ts", "")
            .with_file("/proj/src/app/special.ts", "")
            .with_file("/proj/src/shared/util.ts", "")
            .with_file("/proj/src/env.ts", "");
        let mut paths = IndexMap::new();
        paths.insert("@app/*".to_string(), vec!["app/*".to_string()]);
        paths.insert(
            "@app/core/*".to_string(),
            vec!["missing/*".to_string(), "app/core/*".to_string()],
        );
        paths.insert("@special".to_string(), vec!["app/special".to_string()]);
        let config = ResolverConfig {
            base_url: Some(PathBuf::from("/proj/src")),
            paths,
            ..ResolverConfig::default()
        };

        assert_eq!(resolve(&fs, &config, "@app/core"), Some("/proj/src/app/core/index.ts".into()));
        assert_eq!(resolve(&fs, &config, "@special"), Some("/proj/src/app/special.ts".into()));
        assert_eq!(resolve(&fs, &config, "shared/util"), Some("/proj/src/shared/util.ts".into()));
        assert_eq!(resolve(&fs, &config, "env"), Some("/proj/src/env.ts".into()));
    }

    #[test]
    fn test_longest_paths_prefix_wins() {
        let fs = MemoryFs::new()
            .with_file("/proj/src/generic/x.ts", "")
            .with_file("/proj/src/specific/x.ts", "");
        let mut paths = IndexMap::new();
        paths.insert("@lib/*".to_string(), vec!["src/generic/*".to_string()]);
        paths.insert("@lib/deep/*".to_string(), vec!["src/specific/*".to_string()]);
        let config = ResolverConfig {
            paths,
            paths_base: Some(PathBuf::from("/proj")),
            ..ResolverConfig::default()
        };

        assert_eq!(resolve(&fs, &config, "@lib/deep/x"), Some("/proj/src/specific/x.ts".into()));
        assert_eq!(resolve(&fs, &config, "@lib/x"), Some("/proj/src/generic/x.ts".into()));
    }

    #[test]
    fn test_node_modules_and_types_packages() {
        let fs = MemoryFs::new()
            .with_file(
                "/proj/node_modules/typed/package.json",
                r#"{ "typings": "lib/index.d.ts" }"#,
            )
            .with_file("/proj/node_modules/typed/lib/index.d.ts", "")
            .with_file("/proj/node_modules/@types/untyped/index.d.ts", "")
            .with_file("/proj/node_modules/@types/scope__pkg/sub.d.ts", "")
            .with_file("/proj/src/node_modules/near/index.ts", "");
        let config = ResolverConfig::default();

        assert_eq!(
            resolve(&fs, &config, "typed"),
            Some("/proj/node_modules/typed/lib/index.d.ts".into())
        );
        assert_eq!(
            resolve(&fs, &config, "untyped"),
            Some("/proj/node_modules/@types/untyped/index.d.ts".into())
        );
        assert_eq!(
            resolve(&fs, &config, "@scope/pkg/sub"),
            Some("/proj/node_modules/@types/scope__pkg/sub.d.ts".into())
        );
        assert_eq!(
            resolve(&fs, &config, "near"),
            Some("/proj/src/node_modules/near/index.ts".into())
        );
        assert_eq!(resolve(&fs, &config, "absent"), None);
    }

    #[test]
    fn test_split_package_name() {
        assert_eq!(split_package_name("lodash"), ("lodash", ""));
        assert_eq!(split_package_name("lodash/fp/map"), ("lodash", "fp/map"));
        assert_eq!(split_package_name("@scope/pkg"), ("@scope/pkg", ""));
        assert_eq!(split_package_name("@scope/pkg/sub"), ("@scope/pkg", "sub"));
        assert_eq!(types_package_name("@scope/pkg"), "scope__pkg");
    }
}
