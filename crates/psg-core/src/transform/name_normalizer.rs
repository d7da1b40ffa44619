use std::sync::LazyLock;

use regex::Regex;

use crate::ir::DEFAULT_TAG;

static PATH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(.*?)\}").expect("path parameter pattern is valid"));

/// Lowercase the first character, leaving the rest untouched.
///
/// `UsersService` → `usersService`, `petService` → `petService`.
pub fn to_camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase the first character, leaving the rest untouched.
fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Class name of the service generated for `tag`.
///
/// Characters that cannot appear in an identifier split the tag into words,
/// which are joined with an uppercase first letter after the first one. A
/// leading digit gets a `_` prefix. Tags that are already identifiers are
/// kept as they are.
///
/// - `pet` → `petService`
/// - `Pet Store` → `PetStoreService`
/// - `user-management` → `userManagementService`
/// - `2fa` → `_2faService`
pub fn service_name(tag: &str) -> String {
    let mut name = String::new();
    for (idx, word) in tag
        .split(|c: char| !is_identifier_char(c))
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        if idx == 0 {
            name.push_str(word);
        } else {
            name.push_str(&upper_first(word));
        }
    }

    if name.is_empty() {
        name.push_str(DEFAULT_TAG);
    } else if name.starts_with(|c: char| c.is_numeric()) {
        name.insert(0, '_');
    }

    format!("{name}Service")
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Derive a camelCase method name from HTTP verb + route.
///
/// An explicit `operationId` always wins. Otherwise the query string is
/// dropped and every non-empty path segment is appended to the lowercased
/// verb: `{param}` placeholders become `ByParam`, literal segments lose
/// their non-alphanumeric characters and get an uppercase first letter.
///
/// Examples:
/// - `get /users/{id}` → `getUsersById`
/// - `post /pet/{petId}/uploadImage` → `postPetByPetIdUploadImage`
/// - `get /users?limit=10` → `getUsers`
/// - `get ///` → `get`
pub fn derive_method_name(verb: &str, route: Option<&str>, operation_id: Option<&str>) -> String {
    if let Some(id) = operation_id.filter(|id| !id.is_empty()) {
        return id.to_string();
    }

    let verb = verb.to_lowercase();
    let Some(route) = route.filter(|r| !r.is_empty()) else {
        return verb;
    };

    let path = route.split('?').next().unwrap_or_default();

    let mut raw = verb;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        raw.push_str(&segment_to_name_part(segment));
    }

    to_camel_case(&raw)
}

fn segment_to_name_part(segment: &str) -> String {
    if let Some(param) = placeholder_name(segment) {
        return format!("By{}", upper_first(param));
    }

    let cleaned: String = segment
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    upper_first(&cleaned)
}

/// `{petId}` → `Some("petId")`; anything else → `None`.
fn placeholder_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// Extract `{param}` names from a route, left to right, duplicates kept.
pub fn path_params(route: &str) -> Vec<String> {
    PATH_PARAM
        .captures_iter(route)
        .map(|c| c[1].to_string())
        .collect()
}

/// Turn `/pet/{petId}` into the template literal body `/pet/${petId}`.
pub fn route_template(route: &str) -> String {
    let escaped = route.replace('\\', "\\\\").replace('`', "\\`");
    PATH_PARAM
        .replace_all(&escaped, |caps: &regex::Captures| format!("${{{}}}", &caps[1]))
        .into_owned()
}
