//! Helpers for extracting typed parameters from a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. A missing or
//! `null` key yields the default; a key that is present with the wrong type
//! or range is reported as `SimError::InvalidParameter` so that a typo in a
//! parameter file never silently runs with default settings.

use crate::error::SimError;
use serde_json::Value;

/// First of `names` that is present and not `null`.
fn lookup<'a>(params: &'a Value, names: &[&'a str]) -> Option<(&'a str, &'a Value)> {
    names
        .iter()
        .find_map(|&name| match params.get(name) {
            None | Some(Value::Null) => None,
            Some(v) => Some((name, v)),
        })
}

/// Extracts an `f64` from `params[name]`, returning `default` if missing.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
pub fn param_f64(params: &Value, name: &str, default: f64) -> Result<f64, SimError> {
    param_f64_any(params, &[name], default)
}

/// Like [`param_f64`], but tries each key in `names` before falling back.
pub fn param_f64_any(params: &Value, names: &[&str], default: f64) -> Result<f64, SimError> {
    match lookup(params, names) {
        None => Ok(default),
        Some((name, v)) => v
            .as_f64()
            .ok_or_else(|| SimError::invalid_parameter(name, format!("expected a number, got {v}"))),
    }
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing.
///
/// Negative, fractional and non-numeric values are errors.
pub fn param_usize(params: &Value, name: &str, default: usize) -> Result<usize, SimError> {
    match lookup(params, &[name]) {
        None => Ok(default),
        Some((name, v)) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                SimError::invalid_parameter(name, format!("expected a non-negative integer, got {v}"))
            }),
    }
}

/// Extracts a `String` from `params[name]`, returning `default` if missing.
pub fn param_string(params: &Value, name: &str, default: &str) -> Result<String, SimError> {
    match lookup(params, &[name]) {
        None => Ok(default.to_owned()),
        Some((name, v)) => v
            .as_str()
            .map(String::from)
            .ok_or_else(|| SimError::invalid_parameter(name, format!("expected a string, got {v}"))),
    }
}

/// Extracts `params[name]` as a list of `[x, y, k]` triples.
///
/// Returns `Ok(None)` when the key is absent or null, and
/// `SimError::InvalidParameter` when it is present but malformed.
pub fn param_vortices(
    params: &Value,
    name: &str,
) -> Result<Option<Vec<(f64, f64, f64)>>, SimError> {
    let list = match params.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(list)) => list,
        Some(_) => {
            return Err(SimError::invalid_parameter(
                name,
                "expected an array of [x, y, k] triples",
            ))
        }
    };
    list.iter()
        .enumerate()
        .map(|(i, entry)| {
            let nums: Option<Vec<f64>> = entry
                .as_array()
                .and_then(|a| a.iter().map(Value::as_f64).collect());
            match nums.as_deref() {
                Some(&[x, y, k]) => Ok((x, y, k)),
                _ => Err(SimError::invalid_parameter(
                    name,
                    format!("entry {i} is not a numeric [x, y, k] triple"),
                )),
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f64 --

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"dt": 2.5});
        assert_eq!(param_f64(&params, "dt", 1.0).unwrap(), 2.5);
    }

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"dt": 5});
        assert_eq!(param_f64(&params, "dt", 0.0).unwrap(), 5.0);
    }

    #[test]
    fn param_f64_returns_default_when_key_missing_or_null() {
        assert_eq!(param_f64(&json!({"other": 1.0}), "dt", 3.0).unwrap(), 3.0);
        assert_eq!(param_f64(&json!({"dt": null}), "dt", 3.0).unwrap(), 3.0);
    }

    #[test]
    fn param_f64_rejects_wrong_type() {
        let err = param_f64(&json!({"dt": "fast"}), "dt", 1.0).unwrap_err();
        match err {
            SimError::InvalidParameter { name, reason } => {
                assert_eq!(name, "dt");
                assert!(reason.contains("fast"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!("not an object");
        assert_eq!(param_f64(&params, "dt", 7.0).unwrap(), 7.0);
    }

    #[test]
    fn param_f64_any_prefers_first_present_key() {
        let params = json!({"ngrid": 20.0, "half_width": 12.0});
        assert_eq!(param_f64_any(&params, &["half_width", "ngrid"], 30.0).unwrap(), 12.0);
        let params = json!({"ngrid": 20.0});
        assert_eq!(param_f64_any(&params, &["half_width", "ngrid"], 30.0).unwrap(), 20.0);
        assert_eq!(param_f64_any(&json!({}), &["half_width", "ngrid"], 30.0).unwrap(), 30.0);
    }

    #[test]
    fn param_f64_any_names_the_alias_that_was_wrong() {
        let err = param_f64_any(&json!({"r_mask": [1]}), &["mask_radius", "r_mask"], 1.0);
        assert!(matches!(err, Err(SimError::InvalidParameter { name, .. }) if name == "r_mask"));
    }

    // -- param_usize --

    #[test]
    fn param_usize_extracts_existing_integer() {
        let params = json!({"steps": 42});
        assert_eq!(param_usize(&params, "steps", 0).unwrap(), 42);
    }

    #[test]
    fn param_usize_returns_default_when_missing() {
        assert_eq!(param_usize(&json!({}), "steps", 5).unwrap(), 5);
    }

    #[test]
    fn param_usize_rejects_float_value() {
        let params = json!({"steps": 2.5});
        assert!(param_usize(&params, "steps", 99).is_err());
    }

    #[test]
    fn param_usize_rejects_negative_integer() {
        let params = json!({"steps": -1});
        assert!(matches!(
            param_usize(&params, "steps", 5),
            Err(SimError::InvalidParameter { .. })
        ));
    }

    // -- param_string --

    #[test]
    fn param_string_extracts_existing_string() {
        let params = json!({"scenario": "pair"});
        assert_eq!(param_string(&params, "scenario", "leapfrog").unwrap(), "pair");
    }

    #[test]
    fn param_string_returns_default_when_missing() {
        assert_eq!(param_string(&json!({}), "scenario", "leapfrog").unwrap(), "leapfrog");
    }

    #[test]
    fn param_string_rejects_wrong_type() {
        let params = json!({"scenario": 42});
        assert!(param_string(&params, "scenario", "leapfrog").is_err());
    }

    // -- param_vortices --

    #[test]
    fn param_vortices_absent_is_none() {
        assert_eq!(param_vortices(&json!({}), "vortices").unwrap(), None);
        assert_eq!(
            param_vortices(&json!({"vortices": null}), "vortices").unwrap(),
            None
        );
    }

    #[test]
    fn param_vortices_parses_triples() {
        let params = json!({"vortices": [[-28, -10, -2], [-28.0, 10.0, 2.0]]});
        let got = param_vortices(&params, "vortices").unwrap().unwrap();
        assert_eq!(got, vec![(-28.0, -10.0, -2.0), (-28.0, 10.0, 2.0)]);
    }

    #[test]
    fn param_vortices_rejects_short_entry() {
        let params = json!({"vortices": [[1.0, 2.0]]});
        assert!(matches!(
            param_vortices(&params, "vortices"),
            Err(SimError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn param_vortices_rejects_non_numeric_entry() {
        let params = json!({"vortices": [[1.0, "two", 3.0]]});
        assert!(param_vortices(&params, "vortices").is_err());
    }

    #[test]
    fn param_vortices_rejects_non_array() {
        let params = json!({"vortices": "four of them"});
        assert!(param_vortices(&params, "vortices").is_err());
    }
}
