//! Required-fields validation
//!
//! Walks a container against a [`RequireSpec`] with the same broadcast/keyed
//! dispatch as the sanitizer and collects the labels of required fields that
//! are absent or empty. A failing nested spec is reported once, under its
//! parent's label.

use super::container::{self, is_empty_value};
use super::error::{MissingFields, SanitizeError};
use super::flags::Flags;
use super::sanitizer::Sanitizer;
use super::spec::RequireSpec;
use serde_json::Value;

/// Label used when a top-level field spec fails
const ROOT_LABEL: &str = "value";

impl Sanitizer {
    /// Report which required fields of `container` are missing or empty
    ///
    /// ```rust,ignore
    /// let spec = RequireSpec::keyed([("a", true), ("b", true)]);
    /// let result = Sanitizer::new().find_missing_fields(&json!({"a": "5"}), &spec, Flags::empty());
    /// assert_eq!(result.unwrap_err().labels(), ["b"]);
    /// ```
    pub fn find_missing_fields(
        &self,
        container: &Value,
        spec: &RequireSpec,
        flags: impl Into<Flags>,
    ) -> Result<(), MissingFields> {
        let flags = self.effective_flags(flags.into());
        let container = self.decode(container, flags);

        let labels = match spec {
            RequireSpec::Field { required, label } => {
                if *required && is_empty_value(&container) {
                    vec![label.clone().unwrap_or_else(|| ROOT_LABEL.to_string())]
                } else {
                    Vec::new()
                }
            }
            RequireSpec::Each(_) if is_empty_value(&container) && spec.has_requirements() => {
                vec![ROOT_LABEL.to_string()]
            }
            _ => match self.missing_in(&container, spec, flags, 0) {
                Ok(labels) => labels,
                Err(err) => {
                    tracing::warn!(error = %err, "required-fields check aborted");
                    vec![ROOT_LABEL.to_string()]
                }
            },
        };

        match MissingFields::new(labels) {
            Some(missing) => {
                tracing::debug!(missing = %missing, "required fields missing");
                Err(missing)
            }
            None => Ok(()),
        }
    }

    /// Labels of the failing fields directly below `value`
    fn missing_in(
        &self,
        value: &Value,
        spec: &RequireSpec,
        flags: Flags,
        depth: usize,
    ) -> Result<Vec<String>, SanitizeError> {
        self.check_depth(depth)?;
        let mut labels = Vec::new();

        match spec {
            RequireSpec::Field { .. } => {
                if spec.has_requirements() && is_empty_value(value) {
                    labels.push(spec.label().unwrap_or(ROOT_LABEL).to_string());
                }
            }
            RequireSpec::Each(inner) => {
                if inner.is_skipped() {
                    return Ok(labels);
                }
                for (key, item) in container::entries(value) {
                    if !self.satisfied(Some(item), inner, flags, depth) {
                        labels.push(inner.label().map_or(key, str::to_string));
                    }
                }
            }
            RequireSpec::Keyed(entries) => {
                for (key, entry) in entries {
                    if entry.is_skipped() {
                        continue;
                    }
                    let item = container::lookup(value, key);
                    if !self.satisfied(item, entry, flags, depth) {
                        labels.push(entry.label().unwrap_or(key).to_string());
                    }
                }
            }
        }

        Ok(labels)
    }

    /// Whether one field passes its requirement
    fn satisfied(&self, item: Option<&Value>, spec: &RequireSpec, flags: Flags, depth: usize) -> bool {
        let Some(item) = item else {
            return !spec.has_requirements();
        };
        let item = self.decode(item, flags);
        if is_empty_value(&item) {
            return !spec.has_requirements();
        }

        match spec {
            RequireSpec::Field { .. } => true,
            RequireSpec::Each(_) | RequireSpec::Keyed(_) => {
                match self.missing_in(&item, spec, flags, depth + 1) {
                    Ok(labels) => labels.is_empty(),
                    Err(err) => {
                        tracing::warn!(error = %err, "treating subtree as missing");
                        false
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SanitizerConfig;
    use crate::core::flags::Flag;
    use serde_json::json;

    fn missing(container: Value, spec: &RequireSpec) -> Option<Vec<String>> {
        Sanitizer::new()
            .find_missing_fields(&container, spec, Flags::empty())
            .err()
            .map(MissingFields::into_labels)
    }

    // === keyed ===

    #[test]
    fn test_absent_required_key_is_reported() {
        let spec = RequireSpec::keyed([("a", true), ("b", true)]);
        assert_eq!(missing(json!({"a": "5"}), &spec), Some(vec!["b".to_string()]));
    }

    #[test]
    fn test_all_present_is_ok() {
        let spec = RequireSpec::keyed([("a", true), ("b", true)]);
        assert_eq!(missing(json!({"a": "5", "b": 0}), &spec), None);
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let spec = RequireSpec::keyed([("a", true), ("b", true), ("c", true), ("d", true)]);
        let result = missing(json!({"a": null, "b": "", "c": [], "d": {}}), &spec);
        assert_eq!(result.map(|labels| labels.len()), Some(4));
    }

    #[test]
    fn test_false_and_zero_are_present() {
        let spec = RequireSpec::keyed([("a", true), ("b", true)]);
        assert_eq!(missing(json!({"a": false, "b": 0}), &spec), None);
    }

    #[test]
    fn test_optional_fields_are_skipped() {
        let spec = RequireSpec::keyed([
            ("a", RequireSpec::optional()),
            ("b", RequireSpec::labeled(false, "Bee")),
        ]);
        assert_eq!(missing(json!({}), &spec), None);
    }

    #[test]
    fn test_label_replaces_key() {
        let spec = RequireSpec::keyed([("email", (true, "Email address"))]);
        assert_eq!(missing(json!({}), &spec), Some(vec!["Email address".to_string()]));
    }

    #[test]
    fn test_nested_failure_reports_parent_once() {
        let spec = RequireSpec::keyed([(
            "address",
            RequireSpec::keyed([("street", true), ("city", true)]),
        )]);
        assert_eq!(
            missing(json!({"address": {"zip": "0150"}}), &spec),
            Some(vec!["address".to_string()])
        );
        assert_eq!(
            missing(json!({"address": {"street": "x", "city": "y"}}), &spec),
            None
        );
    }

    #[test]
    fn test_nested_without_requirements_tolerates_absence() {
        let spec = RequireSpec::keyed([("meta", RequireSpec::keyed([("note", false)]))]);
        assert_eq!(missing(json!({}), &spec), None);
    }

    #[test]
    fn test_sequence_container_uses_positions() {
        let spec = RequireSpec::from_sequence(vec![true.into(), true.into()]);
        assert_eq!(missing(json!(["x"]), &spec), Some(vec!["1".to_string()]));
    }

    // === broadcast ===

    #[test]
    fn test_each_reports_element_keys() {
        let spec = RequireSpec::each(true);
        assert_eq!(
            missing(json!(["a", "", "c", null]), &spec),
            Some(vec!["1".to_string(), "3".to_string()])
        );
    }

    #[test]
    fn test_each_nested_keyed() {
        let spec = RequireSpec::each(RequireSpec::keyed([("id", true)]));
        let input = json!({"first": {"id": 1}, "second": {"name": "x"}});
        assert_eq!(missing(input, &spec), Some(vec!["second".to_string()]));
    }

    #[test]
    fn test_each_optional_skips_everything() {
        assert_eq!(missing(json!([null, ""]), &RequireSpec::each(false)), None);
    }

    #[test]
    fn test_each_on_empty_container_is_missing() {
        assert_eq!(
            missing(json!([]), &RequireSpec::each(true)),
            Some(vec!["value".to_string()])
        );
    }

    // === top level ===

    #[test]
    fn test_top_level_field() {
        assert_eq!(missing(json!(""), &RequireSpec::required()), Some(vec!["value".to_string()]));
        assert_eq!(
            missing(json!(null), &RequireSpec::labeled(true, "Body")),
            Some(vec!["Body".to_string()])
        );
        assert_eq!(missing(json!("x"), &RequireSpec::required()), None);
    }

    #[test]
    fn test_expect_json_decodes_before_checking() {
        let spec = RequireSpec::keyed([("user", RequireSpec::keyed([("id", true)]))]);
        let input = json!({"user": "{\"id\": 7}"});

        let plain = Sanitizer::new().find_missing_fields(&input, &spec, Flags::empty());
        assert!(plain.is_err());

        let decoded = Sanitizer::new().find_missing_fields(&input, &spec, Flag::ExpectJson);
        assert_eq!(decoded, Ok(()));
    }

    #[test]
    fn test_depth_limit_fails_closed() {
        let sanitizer = Sanitizer::with_config(SanitizerConfig {
            max_depth: 1,
            ..SanitizerConfig::default()
        });
        let spec = RequireSpec::keyed([("a", RequireSpec::keyed([("b", true)]))]);
        let result = sanitizer.find_missing_fields(&json!({"a": {"b": 1}}), &spec, Flags::empty());
        assert_eq!(result.unwrap_err().labels(), ["a".to_string()]);
    }
}
