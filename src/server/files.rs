use std::path::{Path, PathBuf};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::util::html_escape;

/// Bytes escaped in listing links: everything except RFC 3986 unreserved.
const HREF_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, PartialEq, Eq)]
pub(super) enum ResolveError {
    /// The decoded path is not valid UTF-8.
    BadRequest,
    /// The path tries to leave the served root.
    Forbidden,
}

/// Map a request path onto a file system path under `root`.
pub(super) fn resolve(root: &Path, url_path: &str) -> Result<PathBuf, ResolveError> {
    let decoded = percent_decode_str(url_path)
        .decode_utf8()
        .map_err(|_| ResolveError::BadRequest)?;
    let mut path = root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(ResolveError::Forbidden),
            s if is_forbidden_segment(s) => return Err(ResolveError::Forbidden),
            s => path.push(s),
        }
    }
    Ok(path)
}

fn is_forbidden_segment(segment: &str) -> bool {
    // drive prefixes and alternate data streams
    let windows_only = cfg!(windows) && segment.contains(':');
    segment.contains('\\') || segment.contains('\0') || windows_only
}

struct ListingEntry {
    name: String,
    is_dir: bool,
}

/// HTML index of `dir`, linked relative to `url_path`.
pub(super) async fn render_listing(dir: &Path, url_path: &str) -> std::io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        entries.push(ListingEntry { name, is_dir });
    }
    entries.sort_by_key(|e| e.name.to_lowercase());

    let title = html_escape(&percent_decode_str(url_path).decode_utf8_lossy());
    let mut items = String::new();
    for entry in &entries {
        let slash = if entry.is_dir { "/" } else { "" };
        items.push_str(&format!(
            "<li><a href=\"{href}{slash}\">{name}{slash}</a></li>\n",
            href = utf8_percent_encode(&entry.name, HREF_SEGMENT_SET),
            name = html_escape(&entry.name),
        ));
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Directory listing for {title}</title>
</head>
<body>
<h1>Directory listing for {title}</h1>
<hr>
<ul>
{items}</ul>
<hr>
</body>
</html>
"#
    ))
}
