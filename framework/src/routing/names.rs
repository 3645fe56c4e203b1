use std::collections::HashMap;

/// Route name -> path pattern table used for URL generation
///
/// Owned by the `Router` and shared with every request it dispatches, so
/// handlers can build links (e.g. a `Location` header) without hardcoding paths.
#[derive(Debug, Clone, Default)]
pub struct RouteNames {
    names: HashMap<String, String>,
}

impl RouteNames {
    pub fn insert(&mut self, name: &str, path: &str) {
        self.names.insert(name.to_string(), path.to_string());
    }

    pub fn path(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(|s| s.as_str())
    }

    /// Generate a URL for a named route with parameters
    ///
    /// # Example
    /// ```rust,ignore
    /// let url = names.url("todo.show", &[("id", "123")]);
    /// assert_eq!(url, Some("/api/todo/123".to_string()));
    /// ```
    pub fn url(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let mut url = self.path(name)?.to_string();
        for (key, value) in params {
            url = url.replace(&format!("{{{}}}", key), value);
        }
        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url_substitutes_every_placeholder() {
        let mut names = RouteNames::default();
        names.insert("todo.show", "/api/todo/{id}");
        names.insert("nested", "/lists/{list}/items/{id}");

        assert_eq!(names.url("todo.show", &[("id", "5")]), Some("/api/todo/5".to_string()));
        assert_eq!(
            names.url("nested", &[("list", "a"), ("id", "b")]),
            Some("/lists/a/items/b".to_string())
        );
        assert_eq!(names.path("todo.show"), Some("/api/todo/{id}"));
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert_eq!(RouteNames::default().url("missing", &[]), None);
    }
}
