use std::fmt;

use serde::Serialize;

/// Cache key: operation name plus its serialized argument object. Two reads
/// with equal keys share one cache entry and one in-flight request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    endpoint: &'static str,
    args: String,
}

impl QueryKey {
    pub fn new<A: Serialize>(endpoint: &'static str, args: &A) -> Self {
        Self {
            endpoint,
            args: serde_json::to_string(args).unwrap_or_default(),
        }
    }

    /// Key for an operation that takes no arguments
    pub fn bare(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            args: String::new(),
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.endpoint, self.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Args {
        offset: usize,
        text: Option<String>,
    }

    #[test]
    fn equal_args_produce_equal_keys() {
        let a = QueryKey::new("getProducts", &Args { offset: 0, text: None });
        let b = QueryKey::new("getProducts", &Args { offset: 0, text: None });
        assert_eq!(a, b);
    }

    #[test]
    fn different_args_produce_different_keys() {
        let a = QueryKey::new("getProducts", &Args { offset: 0, text: None });
        let b = QueryKey::new("getProducts", &Args { offset: 9, text: None });
        assert_ne!(a, b);
    }

    #[test]
    fn endpoint_is_part_of_the_key() {
        let a = QueryKey::bare("getCategories");
        let b = QueryKey::bare("getProducts");
        assert_ne!(a, b);
    }
}
