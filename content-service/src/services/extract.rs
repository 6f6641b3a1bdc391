//! Plain-text extraction from fetched HTML and uploaded PDFs.
//!
//! The HTML path is a deliberately simple tag stripper, not a DOM parse:
//! the output feeds a language model, so whitespace-normalized text is all
//! that is needed.

/// Remove every `open`..`close` element, content included.
fn strip_element(html: &mut String, open: &str, close: &str) {
    while let Some(start) = html.find(open) {
        match html[start..].find(close) {
            Some(end) => html.replace_range(start..start + end + close.len(), ""),
            None => break,
        }
    }
}

pub fn html_to_text(html: &str) -> String {
    let mut text = html.to_string();
    strip_element(&mut text, "<script", "</script>");
    strip_element(&mut text, "<style", "</style>");

    let mut result = String::new();
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    // Decode common HTML entities
    let result = result
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    // Normalize whitespace
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn pdf_to_text(data: &[u8]) -> Result<String, pdf_extract::OutputError> {
    let text = pdf_extract::extract_text_from_mem(data)?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_and_style_contents_are_excluded() {
        let html = r#"<html><head>
            <style>body { color: red; }</style>
            <script>console.log("tracking");</script>
        </head><body><p>本文です</p></body></html>"#;

        let text = html_to_text(html);
        assert_eq!(text, "本文です");
        assert!(!text.contains("color"));
        assert!(!text.contains("tracking"));
    }

    #[test]
    fn blank_lines_collapse_to_single_separators() {
        let html = "<p>first</p>\n\n\n<p>second</p>\n\n<p>third</p>";
        assert_eq!(html_to_text(html), "first second third");
    }

    #[test]
    fn plain_text_round_trips_with_normalized_whitespace() {
        assert_eq!(html_to_text("  already   plain \n text "), "already plain text");
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(html_to_text("A&nbsp;&amp;&nbsp;B &lt;ok&gt;"), "A & B <ok>");
    }

    #[test]
    fn unclosed_script_is_left_alone() {
        // A missing close tag must not loop or panic.
        let text = html_to_text("<script>var x = 1; <p>after</p>");
        assert!(text.contains("after"));
    }

    #[test]
    fn pdf_extraction_rejects_garbage_input() {
        assert!(pdf_to_text(b"this is not a pdf").is_err());
    }
}
