use std::fmt;

/// Addressable screens: `/`, `/repos/<name>`, everything else is not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Detail(String),
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');

        if normalized.is_empty() {
            return Route::List;
        }

        if let Some(rest) = normalized.strip_prefix("/repos/") {
            if !rest.is_empty() && !rest.contains('/') {
                if let Ok(name) = urlencoding::decode(rest) {
                    return Route::Detail(name.into_owned());
                }
            }
        }

        Route::NotFound(trimmed.to_string())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => write!(f, "/"),
            Route::Detail(name) => write!(f, "/repos/{}", urlencoding::encode(name)),
            Route::NotFound(path) => write!(f, "{}", path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_list() {
        assert_eq!(Route::parse("/"), Route::List);
        assert_eq!(Route::parse(""), Route::List);
    }

    #[test]
    fn repo_path_is_detail() {
        assert_eq!(Route::parse("/repos/folio"), Route::Detail("folio".into()));
        assert_eq!(Route::parse("/repos/folio/"), Route::Detail("folio".into()));
    }

    #[test]
    fn repo_name_is_decoded() {
        assert_eq!(
            Route::parse("/repos/my%20repo"),
            Route::Detail("my repo".into())
        );
        assert_eq!(Route::Detail("my repo".into()).to_string(), "/repos/my%20repo");
    }

    #[test]
    fn anything_else_is_not_found() {
        assert_eq!(
            Route::parse("/non-existent-url"),
            Route::NotFound("/non-existent-url".into())
        );
        assert!(matches!(Route::parse("/repos/"), Route::NotFound(_)));
        assert!(matches!(Route::parse("/repos/a/b"), Route::NotFound(_)));
    }
}
