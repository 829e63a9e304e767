//! Resolution of `href`/`src` references against a flat file set

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // `https:`, `data:`, `chrome-extension:`, `blob:` ...
    static ref URI_SCHEME: Regex = Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").unwrap();
}

/// Resolves reference paths found in HTML to file set paths.
///
/// `root` is the directory the extension lives in inside the file set
/// (`""` or a `/`-terminated prefix such as `"my-ext/"`); absolute references
/// are anchored there instead of at the file system root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathResolver {
    root: String,
}

impl PathResolver {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `ref_path` relative to `base_dir`.
    ///
    /// Returns `None` for external references, which must not be inlined.
    pub fn resolve(&self, base_dir: &str, ref_path: &str) -> Option<String> {
        let path = strip_query_and_fragment(ref_path);

        if is_external(path) {
            return None;
        }

        if let Some(absolute) = path.strip_prefix('/') {
            return Some(format!("{}{}", self.root, absolute));
        }

        let mut stack: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    // Popping past the top is a no-op
                    stack.pop();
                }
                other => stack.push(other),
            }
        }

        Some(stack.join("/"))
    }
}

fn strip_query_and_fragment(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or(path);
    path.split('#').next().unwrap_or(path)
}

fn is_external(path: &str) -> bool {
    path.starts_with("//") || URI_SCHEME.is_match(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("a/b/", "../c.css", Some("a/c.css") ; "parent")]
    #[test_case("a/b/", "./c.css", Some("a/b/c.css") ; "current")]
    #[test_case("a/", "/d.css", Some("d.css") ; "absolute at root")]
    #[test_case("", "../../x.js", Some("x.js") ; "pop past top")]
    #[test_case("a/", "css//main.css", Some("a/css/main.css") ; "empty segment")]
    #[test_case("a/", "s.css?v=3#top", Some("a/s.css") ; "query and fragment")]
    #[test_case("a/", "https://x/y.js", None ; "https")]
    #[test_case("a/", "http://x/y.js", None ; "http")]
    #[test_case("a/", "data:text/css,body{}", None ; "data uri")]
    #[test_case("a/", "//cdn.example.com/lib.js", None ; "protocol relative")]
    fn test_resolve(base: &str, reference: &str, expected: Option<&str>) {
        let resolver = PathResolver::new("");
        assert_eq!(resolver.resolve(base, reference).as_deref(), expected);
    }

    #[test]
    fn test_absolute_uses_inferred_root() {
        let resolver = PathResolver::new("ext/");
        assert_eq!(
            resolver.resolve("ext/popup/", "/styles/main.css").as_deref(),
            Some("ext/styles/main.css")
        );
    }
}
