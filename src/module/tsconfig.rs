//! `tsconfig.json` loading.
//!
//! Only the compiler options that influence module resolution are read:
//! `baseUrl`, `paths` and `allowJs`. Files may contain comments and trailing
//! commas, and may inherit from other configs through `extends`.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use super::fs::{normalize_path, FileSystem};
use super::ResolveError;

const CONFIG_FILE_NAME: &str = "tsconfig.json";

/// Resolution-relevant compiler options with paths made absolute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilerOptions {
    /// Absolute `baseUrl`.
    pub base_url: Option<PathBuf>,
    /// `paths` patterns mapped to their substitution lists.
    pub paths: IndexMap<String, Vec<String>>,
    /// Directory of the config that declared `paths`; substitutions are
    /// relative to it when no `baseUrl` is set.
    pub paths_base: Option<PathBuf>,
    pub allow_js: bool,
}

/// A loaded config, with its `extends` chain already merged.
#[derive(Debug, Clone, PartialEq)]
pub struct TsConfig {
    pub path: PathBuf,
    pub compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    extends: Option<Extends>,
    #[serde(default)]
    compiler_options: RawCompilerOptions,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Extends {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    base_url: Option<String>,
    paths: Option<IndexMap<String, Vec<String>>>,
    allow_js: Option<bool>,
}

impl TsConfig {
    /// Load a config file and everything it extends.
    pub fn load<F: FileSystem>(fs: &F, path: &Path) -> Result<Self, ResolveError> {
        let mut visiting = Vec::new();
        Self::load_chain(fs, &normalize_path(path), &mut visiting)
    }

    /// Find the nearest `tsconfig.json` in `start` or one of its ancestors.
    pub fn find<F: FileSystem>(fs: &F, start: &Path) -> Option<PathBuf> {
        normalize_path(start)
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| fs.is_file(candidate))
    }

    fn load_chain<F: FileSystem>(
        fs: &F,
        path: &Path,
        visiting: &mut Vec<PathBuf>,
    ) -> Result<Self, ResolveError> {
        if visiting.iter().any(|p| p == path) {
            return Err(ResolveError::Config(format!(
                "circular 'extends' chain through {}",
                path.display()
            )));
        }
        visiting.push(path.to_path_buf());

        let text = fs
            .read_to_string(path)
            .map_err(|e| ResolveError::io(path, e))?;
        let raw: RawConfig = serde_json::from_str(&strip_jsonc(&text))
            .map_err(|e| ResolveError::Config(format!("{}: {}", path.display(), e)))?;
        let dir = path.parent().unwrap_or_else(|| Path::new("/"));

        let parents = match raw.extends {
            Some(Extends::One(specifier)) => vec![specifier],
            Some(Extends::Many(specs)) => specs,
            None => Vec::new(),
        };

        let mut options = CompilerOptions::default();
        for specifier in &parents {
            let parent_path = resolve_extends(fs, dir, specifier)?;
            let parent = Self::load_chain(fs, &parent_path, visiting)?;
            options.merge(parent.compiler_options);
        }
        options.apply(raw.compiler_options, dir);

        visiting.pop();
        Ok(TsConfig {
            path: path.to_path_buf(),
            compiler_options: options,
        })
    }
}

impl CompilerOptions {
    /// Overlay options inherited from a later `extends` entry.
    fn merge(&mut self, other: CompilerOptions) {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.paths_base.is_some() {
            self.paths = other.paths;
            self.paths_base = other.paths_base;
        }
        self.allow_js = other.allow_js || self.allow_js;
    }

    /// Apply the options written in the config located in `dir`.
    fn apply(&mut self, raw: RawCompilerOptions, dir: &Path) {
        if let Some(base_url) = raw.base_url {
            self.base_url = Some(normalize_path(&dir.join(base_url)));
        }
        if let Some(paths) = raw.paths {
            self.paths = paths;
            self.paths_base = Some(dir.to_path_buf());
        }
        if let Some(allow_js) = raw.allow_js {
            self.allow_js = allow_js;
        }
    }
}

/// Locate the file an `extends` entry refers to.
fn resolve_extends<F: FileSystem>(
    fs: &F,
    dir: &Path,
    specifier: &str,
) -> Result<PathBuf, ResolveError> {
    let relative = specifier.starts_with("./")
        || specifier.starts_with("../")
        || Path::new(specifier).is_absolute();

    let roots: Vec<PathBuf> = if relative {
        vec![dir.to_path_buf()]
    } else {
        dir.ancestors().map(|d| d.join("node_modules")).collect()
    };

    for root in roots {
        let base = normalize_path(&root.join(specifier));
        let candidates = [
            base.clone(),
            PathBuf::from(format!("{}.json", base.display())),
            base.join(CONFIG_FILE_NAME),
        ];
        if let Some(found) = candidates.into_iter().find(|c| fs.is_file(c)) {
            return Ok(found);
        }
    }

    Err(ResolveError::Config(format!(
        "cannot find config '{}' extended from {}",
        specifier,
        dir.display()
    )))
}

/// Remove comments and trailing commas so the text parses as strict JSON.
fn strip_jsonc(text: &str) -> String {
    let without_comments = strip_comments(text);
    strip_trailing_commas(&without_comments)
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::MemoryFs;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_jsonc() {
        let text = r#"{
            // line comment
            "compilerOptions": { /* block */ "baseUrl": "./src", },
            "url": "http://example.com/*not a comment*/",
            "list": [1, 2,],
        }"#;
        let value: serde_json::Value = serde_json::from_str(&strip_jsonc(text)).unwrap();
        assert_eq!(value["compilerOptions"]["baseUrl"], "./src");
        assert_eq!(value["url"], "http://example.com/*not a comment*/");
        assert_eq!(value["list"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_load_resolves_paths_relative_to_config() {
        let fs = MemoryFs::new().with_file(
            "/proj/tsconfig.json",
            r#"{
                "compilerOptions": {
                    "baseUrl": "src",
                    "paths": { "@app/*": ["app/*"] },
                    "allowJs": true
                }
            }"#,
        );
        let config = TsConfig::load(&fs, Path::new("/proj/tsconfig.json")).unwrap();
        let options = config.compiler_options;

        assert_eq!(options.base_url, Some(PathBuf::from("/proj/src")));
        assert_eq!(options.paths_base, Some(PathBuf::from("/proj")));
        assert_eq!(options.paths["@app/*"], vec!["app/*".to_string()]);
        assert!(options.allow_js);
    }

    #[test]
    fn test_extends_chain_child_overrides_parent() {
        let fs = MemoryFs::new()
            .with_file(
                "/proj/configs/base.json",
                r#"{ "compilerOptions": { "baseUrl": "../lib", "paths": { "x": ["x.ts"] } } }"#,
            )
            .with_file(
                "/proj/tsconfig.json",
                r#"{ "extends": "./configs/base", "compilerOptions": { "baseUrl": "./src" } }"#,
            );
        let options = TsConfig::load(&fs, Path::new("/proj/tsconfig.json"))
            .unwrap()
            .compiler_options;

        assert_eq!(options.base_url, Some(PathBuf::from("/proj/src")));
        // Inherited paths stay relative to the config that declared them
        assert_eq!(options.paths_base, Some(PathBuf::from("/proj/configs")));
        assert!(!options.allow_js);
    }

    #[test]
    fn test_circular_extends_is_an_error() {
        let fs = MemoryFs::new()
            .with_file("/proj/a.json", r#"{ "extends": "./b.json" }"#)
            .with_file("/proj/b.json", r#"{ "extends": "./a.json" }"#);
        let err = TsConfig::load(&fs, Path::new("/proj/a.json")).unwrap_err();
        assert!(matches!(err, ResolveError::Config(_)));
    }

    #[test]
    fn test_find_walks_up() {
        let fs = MemoryFs::new().with_file("/proj/tsconfig.json", "{}");
        assert_eq!(
            TsConfig::find(&fs, Path::new("/proj/src/deep")),
            Some(PathBuf::from("/proj/tsconfig.json"))
        );
        assert_eq!(TsConfig::find(&fs, Path::new("/elsewhere")), None);
    }
}
