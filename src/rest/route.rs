//! rest::route
//!
//! Route templates and compiled routes.
//!
//! # Design
//!
//! A [`Route`] pairs an HTTP method with a path template containing exactly
//! `N` `{placeholder}` segments. The arity is part of the type, so
//! [`Route::compile`] takes `[&str; N]` and cannot fail: a route compiled
//! with the wrong number of parameters does not build.
//!
//! A [`CompiledRoute`] is the immutable, fully substituted result that a
//! [`RestAction`](super::RestAction) carries to the executor. Parameters are
//! percent-encoded, so a value can never add a path segment or start a
//! query string.
//!
//! # Example
//!
//! ```
//! use cordkit::rest::route::{webhooks, Method};
//!
//! let route = webhooks::DELETE_TOKEN_WEBHOOK.compile(["42", "secret"]);
//! assert_eq!(route.method(), Method::Delete);
//! assert_eq!(route.path(), "webhooks/42/secret");
//! assert_eq!(route.template(), "webhooks/{webhook_id}/{token}");
//! ```

use std::fmt;

/// HTTP method of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route template with `N` path parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route<const N: usize> {
    method: Method,
    template: &'static str,
}

impl<const N: usize> Route<N> {
    /// Declare a route. `template` must contain exactly `N` placeholders.
    pub const fn new(method: Method, template: &'static str) -> Self {
        Self { method, template }
    }

    /// The route's method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The unsubstituted template.
    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Substitute `params` into the placeholders, in order, percent-encoding
    /// each one.
    pub fn compile(&self, params: [&str; N]) -> CompiledRoute {
        let mut path = String::with_capacity(self.template.len() + 24 * N);
        let mut rest = self.template;
        let mut params = params.iter();

        while let Some(open) = rest.find('{') {
            path.push_str(&rest[..open]);
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            match params.next() {
                Some(value) => path.push_str(&urlencoding::encode(value)),
                None => path.push_str(&rest[open..open + close + 1]),
            }
            rest = &rest[open + close + 1..];
        }
        path.push_str(rest);

        CompiledRoute {
            method: self.method,
            template: self.template,
            path,
            query: Vec::new(),
        }
    }
}

/// A fully parameterized description of one remote operation.
#[derive(Clone, PartialEq, Eq)]
pub struct CompiledRoute {
    method: Method,
    template: &'static str,
    path: String,
    query: Vec<(String, String)>,
}

impl CompiledRoute {
    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// The route's method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The template this route was compiled from.
    ///
    /// Safe to log: it never contains substituted secrets such as webhook
    /// tokens.
    pub fn template(&self) -> &'static str {
        self.template
    }

    /// The substituted path, relative to the API base.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in insertion order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

// Debug prints the template only; compiled paths may embed tokens.
impl fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("method", &self.method)
            .field("template", &self.template)
            .field("query_len", &self.query.len())
            .finish()
    }
}

impl fmt::Display for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.template)
    }
}

/// OAuth2 application routes.
pub mod applications {
    use super::{Method, Route};

    pub const GET_APPLICATIONS: Route<0> = Route::new(Method::Get, "oauth2/applications");
    pub const GET_APPLICATION: Route<1> =
        Route::new(Method::Get, "oauth2/applications/{application_id}");

    pub const GET_AUTHORIZED_APPLICATIONS: Route<0> = Route::new(Method::Get, "oauth2/tokens");
    pub const GET_AUTHORIZED_APPLICATION: Route<1> =
        Route::new(Method::Get, "oauth2/tokens/{auth_id}");
    pub const DELETE_AUTHORIZED_APPLICATION: Route<1> =
        Route::new(Method::Delete, "oauth2/tokens/{auth_id}");
}

/// Webhook routes.
pub mod webhooks {
    use super::{Method, Route};

    pub const DELETE_WEBHOOK: Route<1> = Route::new(Method::Delete, "webhooks/{webhook_id}");
    pub const DELETE_TOKEN_WEBHOOK: Route<2> =
        Route::new(Method::Delete, "webhooks/{webhook_id}/{token}");
    pub const MODIFY_WEBHOOK: Route<1> = Route::new(Method::Patch, "webhooks/{webhook_id}");
}

/// Channel routes.
pub mod channels {
    use super::{Method, Route};

    pub const GET_WEBHOOKS: Route<1> = Route::new(Method::Get, "channels/{channel_id}/webhooks");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(template: &str) -> usize {
        template.matches('{').count()
    }

    #[test]
    fn compile_without_params() {
        let route = applications::GET_APPLICATIONS.compile([]);
        assert_eq!(route.path(), "oauth2/applications");
        assert_eq!(route.method(), Method::Get);
    }

    #[test]
    fn compile_substitutes_in_order() {
        let route = webhooks::DELETE_TOKEN_WEBHOOK.compile(["1", "abc"]);
        assert_eq!(route.path(), "webhooks/1/abc");
        assert_eq!(route.method(), Method::Delete);
    }

    #[test]
    fn compile_encodes_params() {
        let route = webhooks::DELETE_TOKEN_WEBHOOK.compile(["1", "a/b?c#d e"]);
        assert_eq!(route.path(), "webhooks/1/a%2Fb%3Fc%23d%20e");

        let safe = webhooks::DELETE_TOKEN_WEBHOOK.compile(["1", "Abc-1_2.3~x"]);
        assert_eq!(safe.path(), "webhooks/1/Abc-1_2.3~x");
    }

    #[test]
    fn compile_is_deterministic() {
        let a = channels::GET_WEBHOOKS.compile(["99"]);
        let b = channels::GET_WEBHOOKS.compile(["99"]);
        assert_eq!(a, b);
    }

    #[test]
    fn query_appended_in_order() {
        let route = applications::GET_APPLICATIONS
            .compile([])
            .with_query("limit", "10")
            .with_query("after", "5");
        assert_eq!(
            route.query(),
            &[
                ("limit".to_string(), "10".to_string()),
                ("after".to_string(), "5".to_string())
            ]
        );
    }

    #[test]
    fn debug_and_display_hide_compiled_path() {
        let route = webhooks::DELETE_TOKEN_WEBHOOK.compile(["1", "very-secret-token"]);
        assert!(!format!("{:?}", route).contains("very-secret-token"));
        assert!(!format!("{}", route).contains("very-secret-token"));
        assert_eq!(format!("{}", route), "DELETE webhooks/{webhook_id}/{token}");
    }

    #[test]
    fn route_table_arity_matches_templates() {
        assert_eq!(placeholders(applications::GET_APPLICATIONS.template()), 0);
        assert_eq!(placeholders(applications::GET_APPLICATION.template()), 1);
        assert_eq!(
            placeholders(applications::GET_AUTHORIZED_APPLICATIONS.template()),
            0
        );
        assert_eq!(
            placeholders(applications::GET_AUTHORIZED_APPLICATION.template()),
            1
        );
        assert_eq!(
            placeholders(applications::DELETE_AUTHORIZED_APPLICATION.template()),
            1
        );
        assert_eq!(placeholders(webhooks::DELETE_WEBHOOK.template()), 1);
        assert_eq!(placeholders(webhooks::DELETE_TOKEN_WEBHOOK.template()), 2);
        assert_eq!(placeholders(webhooks::MODIFY_WEBHOOK.template()), 1);
        assert_eq!(placeholders(channels::GET_WEBHOOKS.template()), 1);
    }

    #[test]
    fn method_display() {
        assert_eq!(format!("{}", Method::Get), "GET");
        assert_eq!(format!("{}", Method::Delete), "DELETE");
        assert_eq!(format!("{}", Method::Patch), "PATCH");
    }
}
