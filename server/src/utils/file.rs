//! File utility functions

use std::path::PathBuf;

/// Expand a user-supplied path to an absolute path.
///
/// `~` and `~/rest` resolve against the home directory; relative paths
/// resolve against the current directory. Absolute paths pass through.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    let cwd = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if path.is_empty() {
        return cwd();
    }

    let expanded = match path.strip_prefix('~') {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => dirs::home_dir()
            .map(|home| home.join(&rest[1..]))
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    };

    if expanded.is_relative() {
        cwd().join(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_unchanged() {
        assert_eq!(
            expand_path("/etc/userpanel.json"),
            PathBuf::from("/etc/userpanel.json")
        );
    }

    #[test]
    fn test_relative_path_joins_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path("userpanel.json"), cwd.join("userpanel.json"));
        assert_eq!(expand_path("./conf/a.json"), cwd.join("./conf/a.json"));
    }

    #[test]
    fn test_tilde_expansion() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
            assert_eq!(expand_path("~/.userpanel"), home.join(".userpanel"));
        }
    }

    #[test]
    fn test_tilde_user_form_is_relative() {
        // Only the bare `~` prefix is expanded
        let result = expand_path("~bob/data");
        assert!(result.ends_with("~bob/data"));
    }

    #[test]
    fn test_blank_is_cwd() {
        assert_eq!(expand_path("   "), std::env::current_dir().unwrap());
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(expand_path("  /srv/data  "), PathBuf::from("/srv/data"));
    }
}
