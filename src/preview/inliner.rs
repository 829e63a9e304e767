//! Inlining of local stylesheets and scripts into a popup page

use crate::models::FileSet;
use crate::utils::PathResolver;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref LINK_TAG: Regex = Regex::new(r"(?is)<link\b[^>]*>").unwrap();

    // Only empty external scripts: `<script src=...></script>`
    static ref EXTERNAL_SCRIPT: Regex =
        Regex::new(r"(?is)<script\b([^>]*)>\s*</script\s*>").unwrap();

    static ref ATTRIBUTE: Regex = Regex::new(
        r#"(?s)([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#
    ).unwrap();

    static ref SCRIPT_CLOSE: Regex = Regex::new(r"(?i)</script").unwrap();

    static ref BODY_CLOSE: Regex = Regex::new(r"(?i)</body\s*>").unwrap();
}

/// Rewrites one HTML document so it no longer depends on sibling files
pub struct Inliner<'a> {
    files: &'a FileSet,
    resolver: PathResolver,
    /// Directory of the page being rewritten
    base_dir: &'a str,
}

impl<'a> Inliner<'a> {
    pub fn new(files: &'a FileSet, resolver: PathResolver, base_dir: &'a str) -> Self {
        Self {
            files,
            resolver,
            base_dir,
        }
    }

    pub fn inline(&self, html: &str) -> String {
        let html = self.inline_stylesheets(html);
        let (html, scripts) = self.collect_scripts(&html);
        append_scripts(html, &scripts)
    }

    /// Replace `<link rel="stylesheet">` tags that point at known files
    fn inline_stylesheets(&self, html: &str) -> String {
        LINK_TAG
            .replace_all(html, |caps: &Captures| {
                let tag = &caps[0];
                let is_stylesheet = attribute(tag, "rel")
                    .map(|rel| rel.to_ascii_lowercase().contains("stylesheet"))
                    .unwrap_or(false);
                if !is_stylesheet {
                    return tag.to_string();
                }

                match attribute(tag, "href").and_then(|href| self.lookup(&href)) {
                    Some((path, css)) => format!("<style>/* {} */\n{}</style>", path, css),
                    None => tag.to_string(),
                }
            })
            .into_owned()
    }

    /// Remove external script tags that point at known files and return
    /// their contents as inline blocks, in document order
    fn collect_scripts(&self, html: &str) -> (String, Vec<String>) {
        let mut scripts = Vec::new();
        let rewritten = EXTERNAL_SCRIPT
            .replace_all(html, |caps: &Captures| {
                let found = attribute(&caps[1], "src").and_then(|src| self.lookup(&src));
                match found {
                    Some((path, js)) => {
                        let safe = SCRIPT_CLOSE.replace_all(js, r"<\/script");
                        scripts.push(format!("<script>\n/* {} */\n{}\n</script>", path, safe));
                        String::new()
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned();
        (rewritten, scripts)
    }

    fn lookup(&self, reference: &str) -> Option<(&'a str, &'a str)> {
        let path = self.resolver.resolve(self.base_dir, reference)?;
        self.files
            .get(&path)
            .map(|f| (f.path.as_str(), f.content.as_str()))
    }
}

fn append_scripts(mut html: String, scripts: &[String]) -> String {
    if scripts.is_empty() {
        return html;
    }
    let block = scripts.join("\n");
    match BODY_CLOSE.find(&html).map(|m| m.start()) {
        Some(at) => html.insert_str(at, &block),
        None => html.push_str(&block),
    }
    html
}

/// Value of the first attribute called `name` in a tag or attribute list
fn attribute(tag: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(tag)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .and_then(|caps| caps.get(2).or(caps.get(3)).or(caps.get(4)))
        .map(|m| m.as_str().to_string())
}
