//! Terminal output helpers

/// Render a URL in cyan, as an OSC 8 hyperlink when stdout supports it
pub fn terminal_link(url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        format!("\x1b]8;;{url}\x07{}\x1b]8;;\x07", cyan(url))
    } else {
        cyan(url)
    }
}

fn cyan(text: &str) -> String {
    format!("\x1b[36m{text}\x1b[0m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_link_contains_url_in_cyan() {
        let url = "http://127.0.0.1:5390/__debug__/user/panel";
        let result = terminal_link(url);
        assert!(result.contains(&cyan(url)));
    }

    #[test]
    fn test_terminal_link_hyperlink_wraps_url() {
        let url = "http://localhost:5390/";
        let result = terminal_link(url);
        if result.contains("\x1b]8;;") {
            assert!(result.starts_with(&format!("\x1b]8;;{url}\x07")));
            assert!(result.ends_with("\x1b]8;;\x07"));
        } else {
            assert_eq!(result, cyan(url));
        }
    }
}
