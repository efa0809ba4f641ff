//! Preview document assembly.

/// `sandbox` attribute for the preview frame: scripts run, but the document
/// gets an opaque origin and cannot reach the hosting page.
pub const PREVIEW_SANDBOX: &str = "allow-scripts";

/// Compose html, css and optional js into one displayable document.
///
/// The script element is only emitted when `js` is non-empty.
pub fn compose_document(html: &str, css: &str, js: &str) -> String {
    let script = if js.is_empty() {
        String::new()
    } else {
        format!("<script>{}</script>", js)
    };

    format!(
        "<html><head><style>{}</style></head><body>{}{}</body></html>",
        css, html, script
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_without_script() {
        let doc = compose_document("<h1>Hi</h1>", "h1 { color: red; }", "");
        assert_eq!(
            doc,
            "<html><head><style>h1 { color: red; }</style></head><body><h1>Hi</h1></body></html>"
        );
    }

    #[test]
    fn test_document_with_script() {
        let doc = compose_document("<p></p>", "", "console.log(1)");
        assert!(doc.ends_with("<p></p><script>console.log(1)</script></body></html>"));
    }

    #[test]
    fn test_sandbox_denies_same_origin() {
        assert!(!PREVIEW_SANDBOX.contains("allow-same-origin"));
    }
}
