//! Normalized route templates and the per-source route map.
//!
//! ```rust
//! use fschema::{Route, RouteMap, normalize_path, path_params};
//!
//! let raw = "/pets/{petId}/toys/{toyId}";
//! assert_eq!(normalize_path(raw), "/pets/:petId/toys/:toyId");
//!
//! let mut routes = RouteMap::new();
//! routes.insert(&Route {
//!     path: normalize_path(raw),
//!     method: "GET".to_string(),
//!     operation_id: "getToy".to_string(),
//!     params: path_params(raw),
//!     request_in_body: false,
//! });
//! assert!(routes.contains_function("getToy"));
//! assert_eq!(routes.entry_for("getToy").map(|entry| entry.params.len()), Some(2));
//! ```

use fcommon::Registry;

/// One operation as declared by a schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path template in normalized `:name` form.
    pub path: String,
    /// Uppercase HTTP method as declared.
    pub method: String,
    pub operation_id: String,
    /// Placeholder names in `path`, in order.
    pub params: Vec<String>,
    pub request_in_body: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub pattern: String,
    pub params: Vec<String>,
    pub method: String,
    pub function: String,
}

/// Route table of one schema source, keyed by function name.
///
/// Within a source the first declaration of a function name wins.
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    entries: Registry<String, RouteEntry>,
}

impl RouteMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_routes(routes: &[Route]) -> Self {
        let mut map = Self::new();
        for route in routes {
            map.insert(route);
        }
        map
    }

    /// Returns `false` when the route's function is already mapped.
    pub fn insert(&mut self, route: &Route) -> bool {
        self.entries.insert_if_absent(
            route.operation_id.clone(),
            RouteEntry {
                pattern: route.path.clone(),
                params: route.params.clone(),
                method: route.method.clone(),
                function: route.operation_id.clone(),
            },
        )
    }

    pub fn contains_function(&self, function: &str) -> bool {
        self.entries.contains_key(function)
    }

    pub fn entry_for(&self, function: &str) -> Option<&RouteEntry> {
        self.entries.get(function)
    }

    pub fn pattern_for(&self, function: &str) -> Option<&str> {
        self.entry_for(function).map(|entry| entry.pattern.as_str())
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rewrites `{name}` placeholders to `:name`.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    while let Some((before, name, tail)) = next_braced(rest) {
        out.push_str(before);
        out.push(':');
        out.push_str(name);
        rest = tail;
    }

    out.push_str(rest);
    out
}

/// Names of the `{name}` placeholders in a raw path, in order of appearance.
///
/// Names are taken verbatim from between the braces, so `{pet-id}` yields `pet-id`.
pub fn path_params(path: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some((_, name, tail)) = next_braced(rest) {
        names.push(name.to_string());
        rest = tail;
    }
    names
}

/// Replaces the `:name` token of each entry in `params` with the value produced by
/// `value_for`.
///
/// Tokens are matched in order and only for the declared names, so literal colons in the
/// template (`/models/:model:generate`) stay untouched.
pub fn fill_template<E>(
    pattern: &str,
    params: &[String],
    mut value_for: impl FnMut(&str) -> Result<String, E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    for name in params {
        let token = format!(":{name}");
        let Some(at) = rest.find(&token) else {
            continue;
        };
        out.push_str(&rest[..at]);
        out.push_str(&value_for(name)?);
        rest = &rest[at + token.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

fn next_braced(input: &str) -> Option<(&str, &str, &str)> {
    let open = input.find('{')?;
    let close = open + input[open..].find('}')?;
    Some((&input[..open], &input[open + 1..close], &input[close + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(path: &str, method: &str, operation_id: &str) -> Route {
        Route {
            path: normalize_path(path),
            method: method.to_string(),
            operation_id: operation_id.to_string(),
            params: path_params(path),
            request_in_body: false,
        }
    }

    fn echo(name: &str) -> Result<String, ()> {
        Ok(format!("<{name}>"))
    }

    #[test]
    fn normalize_path_handles_multiple_and_unterminated_placeholders() {
        assert_eq!(normalize_path("/pets"), "/pets");
        assert_eq!(normalize_path("/a/{x}/b/{y}"), "/a/:x/b/:y");
        assert_eq!(normalize_path("/a/{broken"), "/a/{broken");
        assert_eq!(normalize_path("/pets/{pet-id}"), "/pets/:pet-id");
    }

    #[test]
    fn path_params_keep_names_verbatim() {
        assert_eq!(path_params("/users/{userId}/posts/{postId}"), vec!["userId", "postId"]);
        assert_eq!(path_params("/pets/{pet-id}"), vec!["pet-id"]);
        assert_eq!(path_params("/models/{model}:generate"), vec!["model"]);
        assert!(path_params("/health").is_empty());
    }

    #[test]
    fn fill_template_substitutes_each_declared_token() {
        let params = path_params("/users/{userId}/files/{name}.json");
        let filled = fill_template("/users/:userId/files/:name.json", &params, echo)
            .expect("fill should succeed");
        assert_eq!(filled, "/users/<userId>/files/<name>.json");

        let failed = fill_template("/users/:userId", &params, |name| Err(name.to_string()));
        assert_eq!(failed, Err("userId".to_string()));
    }

    #[test]
    fn fill_template_handles_hyphenated_names_and_literal_colons() {
        let hyphen = route("/pets/{pet-id}", "GET", "getPet");
        assert_eq!(
            fill_template(&hyphen.path, &hyphen.params, echo),
            Ok("/pets/<pet-id>".to_string())
        );

        let action = route("/models/{model}:generate", "POST", "generate");
        assert_eq!(
            fill_template(&action.path, &action.params, echo),
            Ok("/models/<model>:generate".to_string())
        );

        let plain = route("/v1/status:check", "GET", "status");
        assert_eq!(
            fill_template(&plain.path, &plain.params, echo),
            Ok("/v1/status:check".to_string())
        );
    }

    #[test]
    fn route_map_keeps_both_methods_on_one_path() {
        let routes = vec![
            route("/pets/{id}", "GET", "getPet"),
            route("/pets/{id}", "DELETE", "deletePet"),
        ];

        let map = RouteMap::from_routes(&routes);
        assert_eq!(map.len(), 2);
        assert!(map.contains_function("getPet"));
        assert!(map.contains_function("deletePet"));
        assert_eq!(
            map.entry_for("deletePet").map(|entry| entry.method.as_str()),
            Some("DELETE")
        );
        assert_eq!(
            map.entry_for("getPet").map(|entry| entry.params.clone()),
            Some(vec!["id".to_string()])
        );
    }

    #[test]
    fn route_map_first_declaration_wins() {
        let mut map = RouteMap::new();
        assert!(map.insert(&route("/a", "GET", "op")));
        assert!(!map.insert(&route("/b", "GET", "op")));
        assert_eq!(map.pattern_for("op"), Some("/a"));
    }
}
