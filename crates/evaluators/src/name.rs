//! Qualified names, element name tests and the prefix table used to resolve them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The namespace bound to the `xml` prefix by definition.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A name with its prefix already resolved to a namespace URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub namespace: Option<String>,
    pub local_name: String,
}

impl QualifiedName {
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    pub fn with_namespace(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    pub fn matches(&self, local_name: &str, namespace: Option<&str>) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == namespace
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// The element test of a selector step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NameTest {
    /// `*`
    Any,
    /// An unprefixed name; matches the local name in any namespace.
    Local(String),
    /// A prefixed name; local name and namespace must both match.
    Qualified(QualifiedName),
}

impl NameTest {
    pub fn matches(&self, local_name: &str, namespace: Option<&str>) -> bool {
        match self {
            NameTest::Any => true,
            NameTest::Local(name) => name == local_name,
            NameTest::Qualified(qname) => qname.matches(local_name, namespace),
        }
    }
}

impl fmt::Display for NameTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameTest::Any => write!(f, "*"),
            NameTest::Local(name) => write!(f, "{}", name),
            NameTest::Qualified(qname) => write!(f, "{}", qname),
        }
    }
}

/// Prefix to namespace URI bindings supplied with the selector configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespaces {
    bindings: BTreeMap<String, String>,
}

impl Namespaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.insert(prefix, uri);
        self
    }

    pub fn insert(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.bindings.insert(prefix.into(), uri.into());
    }

    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        match self.bindings.get(prefix) {
            Some(uri) => Some(uri.as_str()),
            None if prefix == "xml" => Some(XML_NAMESPACE),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    /// Resolves an attribute name such as `code` or `ord:code`.
    /// Unprefixed attributes are in no namespace. Returns `None` for an unbound prefix.
    pub fn attribute_name(&self, raw: &str) -> Option<QualifiedName> {
        match split_prefix(raw) {
            (None, local) => Some(QualifiedName::new(local)),
            (Some(prefix), local) => self
                .resolve(prefix)
                .map(|uri| QualifiedName::with_namespace(uri, local)),
        }
    }

    /// Resolves the name test of a selector step. Returns `None` for an unbound prefix.
    pub fn element_test(&self, raw: &str) -> Option<NameTest> {
        if raw == "*" {
            return Some(NameTest::Any);
        }
        match split_prefix(raw) {
            (None, local) => Some(NameTest::Local(local.to_string())),
            (Some(prefix), local) => self
                .resolve(prefix)
                .map(|uri| NameTest::Qualified(QualifiedName::with_namespace(uri, local))),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Namespaces {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut namespaces = Namespaces::new();
        for (prefix, uri) in iter {
            namespaces.insert(prefix, uri);
        }
        namespaces
    }
}

/// Splits `prefix:local` into its parts.
pub fn split_prefix(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_bound_and_implicit_prefixes() {
        let ns = Namespaces::new().with("ord", "urn:orders");
        assert_eq!(ns.resolve("ord"), Some("urn:orders"));
        assert_eq!(ns.resolve("xml"), Some(XML_NAMESPACE));
        assert_eq!(ns.resolve("missing"), None);
    }

    #[test]
    fn test_attribute_name() {
        let ns = Namespaces::new().with("ord", "urn:orders");
        assert_eq!(ns.attribute_name("code"), Some(QualifiedName::new("code")));
        assert_eq!(
            ns.attribute_name("ord:code"),
            Some(QualifiedName::with_namespace("urn:orders", "code"))
        );
        assert_eq!(ns.attribute_name("x:code"), None);
    }

    #[test]
    fn test_element_test_matching() {
        let ns = Namespaces::new().with("ord", "urn:orders");
        let any = ns.element_test("*").unwrap();
        let local = ns.element_test("item").unwrap();
        let qualified = ns.element_test("ord:item").unwrap();

        assert!(any.matches("whatever", None));
        assert!(local.matches("item", None));
        assert!(local.matches("item", Some("urn:other")));
        assert!(qualified.matches("item", Some("urn:orders")));
        assert!(!qualified.matches("item", None));
        assert!(!qualified.matches("note", Some("urn:orders")));
    }

    #[test]
    fn test_deserialize_from_map() {
        let ns: Namespaces = serde_json::from_str(r#"{"ord": "urn:orders"}"#).unwrap();
        assert_eq!(ns.len(), 1);
        assert_eq!(ns.resolve("ord"), Some("urn:orders"));
    }

    #[test]
    fn test_display() {
        assert_eq!(QualifiedName::with_namespace("urn:a", "b").to_string(), "{urn:a}b");
        assert_eq!(NameTest::Any.to_string(), "*");
    }
}
