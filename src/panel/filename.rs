use crate::model::Source;
use std::borrow::Cow;
use std::cmp::Ordering;

const FORMATTED_SUFFIX: &str = ":formatted";
const INDEX_NAME: &str = "(index)";

/// Derives the label a source is listed and sorted under.
pub trait DisplayName {
    fn display_name<'a>(&self, source: &'a Source) -> Cow<'a, str>;
}

/// Last path segment of the source url; the id when there is no url.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlFilename;

impl DisplayName for UrlFilename {
    fn display_name<'a>(&self, source: &'a Source) -> Cow<'a, str> {
        display_filename(source)
    }
}

impl<F> DisplayName for F
where
    F: Fn(&Source) -> String,
{
    fn display_name<'a>(&self, source: &'a Source) -> Cow<'a, str> {
        Cow::Owned(self(source))
    }
}

/// Returns the file name shown for `source`.
///
/// Pretty-printed sources (`...:formatted`) share their raw name; urls
/// whose path ends in `/` are shown as `(index)`.
pub fn display_filename(source: &Source) -> Cow<'_, str> {
    let url = raw_url(&source.url);
    if url.is_empty() {
        return Cow::Borrowed(source.id.as_str());
    }

    let url = url.split(['#', '?']).next().unwrap_or(url);
    let path = match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        None => url,
    };

    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => Cow::Borrowed(raw_url(name)),
        _ => Cow::Borrowed(INDEX_NAME),
    }
}

fn raw_url(url: &str) -> &str {
    url.strip_suffix(FORMATTED_SUFFIX).unwrap_or(url)
}

/// Compares two display names.
pub trait Collation {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Plain case-sensitive comparison of the names' code points.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexicographic;

impl Collation for Lexicographic {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

impl<F> Collation for F
where
    F: Fn(&str, &str) -> Ordering,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}
