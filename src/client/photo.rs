use lazy_static::lazy_static;
use regex::Regex;

/// Width requested from the thumbnail endpoint.
const THUMBNAIL_SIZE: &str = "w1000";

fn drive_file_id(url: &str) -> Option<&str> {
    lazy_static! {
        // https://drive.google.com/file/d/<id>/view?usp=sharing
        static ref FILE_PATH_RE: Regex =
            Regex::new(r"^https?://drive\.google\.com/file/d/([A-Za-z0-9_-]+)").unwrap();
        // https://drive.google.com/open?id=<id>, .../uc?export=view&id=<id>
        static ref ID_PARAM_RE: Regex =
            Regex::new(r"^https?://drive\.google\.com/(?:open|uc)\?(?:[^#]*&)?id=([A-Za-z0-9_-]+)")
                .unwrap();
    }
    FILE_PATH_RE
        .captures(url)
        .or_else(|| ID_PARAM_RE.captures(url))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Turns a Drive share link into a directly displayable thumbnail URL.
/// Other values pass through unchanged; a missing or blank photo yields an
/// empty string, which the presentation layer maps to a placeholder.
pub fn normalize_photo_url(photo: Option<&str>) -> String {
    let url = match photo.map(str::trim) {
        Some(u) if !u.is_empty() => u,
        _ => return String::new(),
    };
    match drive_file_id(url) {
        Some(id) => format!("https://drive.google.com/thumbnail?id={id}&sz={THUMBNAIL_SIZE}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_file_share_link() {
        let url = "https://drive.google.com/file/d/1AbC-d_9xYz/view?usp=sharing";
        assert_eq!(
            normalize_photo_url(Some(url)),
            "https://drive.google.com/thumbnail?id=1AbC-d_9xYz&sz=w1000"
        );
    }

    #[test]
    fn rewrites_open_and_uc_links() {
        assert_eq!(
            normalize_photo_url(Some("https://drive.google.com/open?id=XYZ123")),
            "https://drive.google.com/thumbnail?id=XYZ123&sz=w1000"
        );
        assert_eq!(
            normalize_photo_url(Some("https://drive.google.com/uc?export=view&id=XYZ123")),
            "https://drive.google.com/thumbnail?id=XYZ123&sz=w1000"
        );
    }

    #[test]
    fn other_urls_pass_through() {
        let url = "https://cdn.example.com/photos/ana.jpg";
        assert_eq!(normalize_photo_url(Some(url)), url);
        let docs = "https://docs.google.com/file/d/abc/view";
        assert_eq!(normalize_photo_url(Some(docs)), docs);
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize_photo_url(Some("")), "");
        assert_eq!(normalize_photo_url(Some("   ")), "");
        assert_eq!(normalize_photo_url(None), "");
    }
}
