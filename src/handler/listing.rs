//! Directory listing module
//!
//! Renders an HTML index for directories that have no index file.

use std::fmt::Write as _;
use std::path::Path;
use tokio::fs;

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown for the entry: directories end in `/`, symlinks in `@`
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative, percent-encoded link target
    fn href(&self) -> String {
        let encoded = urlencoding::encode(&self.name);
        if self.is_dir {
            format!("{encoded}/")
        } else {
            encoded.into_owned()
        }
    }
}

/// Read the entries of `dir`
///
/// `is_dir` follows symlinks so a link to a directory is linked with a trailing slash.
pub async fn read_entries(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let is_symlink = entry.file_type().await?.is_symlink();
        // Dangling symlinks have no target metadata
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    Ok(entries)
}

/// Render the listing page for `display_path` (the decoded request path)
pub fn render_listing(display_path: &str, mut entries: Vec<ListingEntry>) -> String {
    entries.sort_by_cached_key(|e| e.name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{title}</h1>");
    html.push_str("<hr>\n<ul>\n");
    for entry in &entries {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape_html(&entry.href()),
            escape_html(&entry.display_name())
        );
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

/// Escape special characters for HTML text and attribute values
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_sorted_case_insensitive() {
        let html = render_listing(
            "/",
            vec![
                entry("beta.txt", false, false),
                entry("Alpha", true, false),
                entry("gamma.js", false, false),
            ],
        );
        let alpha = html.find("Alpha/").unwrap();
        let beta = html.find("beta.txt").unwrap();
        let gamma = html.find("gamma.js").unwrap();
        assert!(alpha < beta && beta < gamma);
    }

    #[test]
    fn test_entry_decorations() {
        let html = render_listing(
            "/assets/",
            vec![
                entry("css", true, false),
                entry("latest", false, true),
                entry("my file.txt", false, false),
            ],
        );
        assert!(html.contains("<title>Directory listing for /assets/</title>"));
        assert!(html.contains("<li><a href=\"css/\">css/</a></li>"));
        assert!(html.contains("<li><a href=\"latest\">latest@</a></li>"));
        assert!(html.contains("<li><a href=\"my%20file.txt\">my file.txt</a></li>"));
    }

    #[test]
    fn test_names_are_escaped() {
        let html = render_listing("/<x>/", vec![entry("<b>.html", false, false)]);
        assert!(html.contains("Directory listing for /&lt;x&gt;/"));
        assert!(html.contains(">&lt;b&gt;.html</a>"));
        assert!(!html.contains("<b>"));
    }

    #[tokio::test]
    async fn test_read_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let mut entries = read_entries(dir.path()).await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            entries,
            vec![entry("a.txt", false, false), entry("sub", true, false)]
        );
    }
}
