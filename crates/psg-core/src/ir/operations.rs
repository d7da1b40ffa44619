use serde::Serialize;

/// Verbs whose generated method forwards an optional request payload.
pub const PAYLOAD_VERBS: [&str; 3] = ["post", "put", "patch"];

/// One (route, verb) pair extracted from the spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub route: String,
    /// Lowercase HTTP verb.
    pub verb: String,
    pub operation_id: Option<String>,
    pub tag: String,
    pub description: String,
}

impl Operation {
    /// Whether the verb carries a request body.
    pub fn needs_payload(&self) -> bool {
        PAYLOAD_VERBS
            .iter()
            .any(|v| v.eq_ignore_ascii_case(&self.verb))
    }
}
