//! Role labels and role-based dashboard routing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user role, unified to a single labeled shape.
///
/// The backend is inconsistent about how roles travel on the wire:
/// some endpoints send plain strings, others send records with a
/// `role__type` label field. Both shapes are accepted once, at the
/// login boundary; everything downstream sees only `Role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role {
    label: String,
}

impl Role {
    /// Create a role from a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The role label as the backend sent it.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parse a single role from either wire shape.
    ///
    /// Returns `None` for values in neither shape (e.g. numbers, or
    /// records without a `role__type` field).
    pub fn from_value(value: &Value) -> Option<Role> {
        match value {
            Value::String(label) => Some(Role::new(label.clone())),
            Value::Object(map) => map.get("role__type").and_then(Value::as_str).map(Role::new),
            _ => None,
        }
    }

    /// Parse a roles array, skipping unrecognizable entries.
    pub fn from_values(values: &[Value]) -> Vec<Role> {
        values.iter().filter_map(Role::from_value).collect()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Dashboard variants, one per recognized primary role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dashboard {
    Student,
    CoSupervisor,
    Supervisor,
    DepartmentHead,
    Dean,
    UniversityPresident,
    SystemManager,
    Ministry,
    ExternalCompany,
    /// Terminal state for an unrecognized or empty role label. Not an
    /// error: the user stays here until they sign out.
    Unknown,
}

/// Ordered phrase table. `co supervisor` must precede `supervisor`:
/// the boundary check alone would let the shorter phrase match inside
/// the longer one.
const ROUTES: &[(&str, Dashboard)] = &[
    ("student", Dashboard::Student),
    ("co supervisor", Dashboard::CoSupervisor),
    ("supervisor", Dashboard::Supervisor),
    ("department head", Dashboard::DepartmentHead),
    ("dean", Dashboard::Dean),
    ("university president", Dashboard::UniversityPresident),
    ("system manager", Dashboard::SystemManager),
    ("ministry", Dashboard::Ministry),
    ("external company", Dashboard::ExternalCompany),
];

impl Dashboard {
    /// Select the dashboard for a primary role label.
    ///
    /// Matching is case-insensitive phrase containment with word
    /// boundaries, tolerant of `-`/`_`/whitespace separator spelling,
    /// so `"Senior Department Head"` and `"external_company"` both
    /// route where a reader would expect. Unmatched or empty labels
    /// land on [`Dashboard::Unknown`].
    pub fn for_role(label: &str) -> Dashboard {
        let normalized = normalize_label(label);
        if normalized.is_empty() {
            return Dashboard::Unknown;
        }
        for (phrase, dashboard) in ROUTES {
            if contains_phrase(&normalized, phrase) {
                return *dashboard;
            }
        }
        Dashboard::Unknown
    }

    /// Route path for the variant, `None` for the unknown dead end.
    pub fn path(&self) -> Option<&'static str> {
        match self {
            Dashboard::Student => Some("/dashboard/student"),
            Dashboard::CoSupervisor => Some("/dashboard/co-supervisor"),
            Dashboard::Supervisor => Some("/dashboard/supervisor"),
            Dashboard::DepartmentHead => Some("/dashboard/department-head"),
            Dashboard::Dean => Some("/dashboard/dean"),
            Dashboard::UniversityPresident => Some("/dashboard/university-president"),
            Dashboard::SystemManager => Some("/dashboard/system-manager"),
            Dashboard::Ministry => Some("/dashboard/ministry"),
            Dashboard::ExternalCompany => Some("/dashboard/external-company"),
            Dashboard::Unknown => None,
        }
    }
}

/// Lowercase, trim, and flatten `-`/`_` separators to spaces.
fn normalize_label(label: &str) -> String {
    label
        .to_lowercase()
        .replace(['-', '_'], " ")
        .trim()
        .to_string()
}

/// Phrase containment with word boundaries on both ends.
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(phrase) {
        let begin = start + pos;
        let end = begin + phrase.len();
        let left_ok = haystack[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let right_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        if left_ok && right_ok {
            return true;
        }
        start = begin + haystack[begin..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_known_label_routes() {
        let cases = [
            ("student", Dashboard::Student),
            ("co-supervisor", Dashboard::CoSupervisor),
            ("supervisor", Dashboard::Supervisor),
            ("department head", Dashboard::DepartmentHead),
            ("dean", Dashboard::Dean),
            ("university president", Dashboard::UniversityPresident),
            ("system manager", Dashboard::SystemManager),
            ("ministry", Dashboard::Ministry),
            ("external company", Dashboard::ExternalCompany),
        ];
        for (label, expected) in cases {
            assert_eq!(Dashboard::for_role(label), expected, "label {label:?}");
        }
    }

    #[test]
    fn test_routing_ignores_case_and_whitespace() {
        assert_eq!(
            Dashboard::for_role("  Department Head  "),
            Dashboard::DepartmentHead
        );
        assert_eq!(Dashboard::for_role("DEAN"), Dashboard::Dean);
    }

    #[test]
    fn test_routing_matches_phrase_inside_longer_label() {
        assert_eq!(
            Dashboard::for_role("Senior Department Head"),
            Dashboard::DepartmentHead
        );
    }

    #[test]
    fn test_co_supervisor_takes_precedence_over_supervisor() {
        assert_eq!(Dashboard::for_role("co-supervisor"), Dashboard::CoSupervisor);
        assert_eq!(Dashboard::for_role("Co Supervisor"), Dashboard::CoSupervisor);
        assert_eq!(Dashboard::for_role("supervisor"), Dashboard::Supervisor);
    }

    #[test]
    fn test_underscore_spelling_routes() {
        assert_eq!(
            Dashboard::for_role("external_company"),
            Dashboard::ExternalCompany
        );
    }

    #[test]
    fn test_unmatched_and_empty_labels_are_unknown() {
        assert_eq!(Dashboard::for_role(""), Dashboard::Unknown);
        assert_eq!(Dashboard::for_role("   "), Dashboard::Unknown);
        assert_eq!(Dashboard::for_role("janitor"), Dashboard::Unknown);
        // Substring without a word boundary must not match.
        assert_eq!(Dashboard::for_role("deanery"), Dashboard::Unknown);
    }

    #[test]
    fn test_unknown_has_no_path() {
        assert_eq!(Dashboard::Unknown.path(), None);
        assert_eq!(Dashboard::Student.path(), Some("/dashboard/student"));
    }

    #[test]
    fn test_role_from_plain_string() {
        let role = Role::from_value(&json!("dean")).unwrap();
        assert_eq!(role.label(), "dean");
    }

    #[test]
    fn test_role_from_record_shape() {
        let role = Role::from_value(&json!({"role__type": "supervisor"})).unwrap();
        assert_eq!(role.label(), "supervisor");
    }

    #[test]
    fn test_unrecognizable_role_values_are_skipped() {
        let values = vec![json!("student"), json!(42), json!({"name": "x"})];
        let roles = Role::from_values(&values);
        assert_eq!(roles, vec![Role::new("student")]);
    }

    #[test]
    fn test_role_serializes_as_plain_string() {
        let role = Role::new("dean");
        assert_eq!(serde_json::to_value(&role).unwrap(), json!("dean"));
        let parsed: Role = serde_json::from_value(json!("dean")).unwrap();
        assert_eq!(parsed, role);
    }
}
