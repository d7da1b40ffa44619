use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Details of a single operation under a route's method map.
///
/// Only the fields generation consumes are kept; everything else in the
/// operation object is skipped. Each field is read on its own, so a value of
/// the wrong shape is dropped without taking its siblings with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationDetails {
    #[serde(
        default,
        deserialize_with = "lenient_tags",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,

    #[serde(
        rename = "operationId",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub operation_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

/// Any value that can stand in for a piece of text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Other(IgnoredAny),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Text(s) => Some(s),
            Scalar::Int(n) => Some(n.to_string()),
            Scalar::Float(f) => Some(f.to_string()),
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Other(_) => None,
        }
    }
}

/// `operationId` and `description`: scalars become text, anything else is dropped.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<Scalar>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let text = value.into_text();
    if text.is_none() {
        log::warn!("ignoring an operation field that is not a scalar");
    }
    Ok(text)
}

/// `tags`: a list of scalars. A non-scalar entry keeps its slot as an empty
/// tag; a value that is not a list reads as no tags.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Lenient<Vec<Scalar>>>::deserialize(deserializer)? {
        Some(Lenient::Valid(tags)) => Ok(tags
            .into_iter()
            .map(|tag| tag.into_text().unwrap_or_default())
            .collect()),
        Some(Lenient::Invalid(_)) => {
            log::warn!("ignoring operation `tags` that is not a list");
            Ok(Vec::new())
        }
        None => Ok(Vec::new()),
    }
}

/// API metadata, when the document carries an `info` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub version: String,
}

/// A parsed Swagger 2.0 / OpenAPI 3.x document reduced to its `paths` map.
///
/// Route and verb order follow the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SwaggerSpec {
    /// The `swagger` or `openapi` version string, if present.
    pub spec_version: Option<String>,
    pub info: Option<Info>,
    pub paths: IndexMap<String, IndexMap<String, OperationDetails>>,
}

impl SwaggerSpec {
    /// Total number of (route, verb) pairs.
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(IndexMap::len).sum()
    }
}

/// Wire shape of the document before `paths` has been checked.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSpec {
    #[serde(default)]
    pub swagger: Option<serde_json::Value>,

    #[serde(default)]
    pub openapi: Option<serde_json::Value>,

    #[serde(default)]
    pub info: Option<Info>,

    #[serde(default)]
    pub paths: Option<RawPaths>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPaths {
    Map(IndexMap<String, RawPathItem>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPathItem {
    Map(IndexMap<String, RawOperation>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawOperation {
    // Tried first, so a list never reads as a struct
    List(Vec<IgnoredAny>),
    Details(OperationDetails),
    Other(IgnoredAny),
}
