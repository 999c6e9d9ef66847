//! `TESTS.json`: inline test cases grouped by pack.
//!
//! ```json
//! { "pack1": { "t1": ["5", "10"], "t2": ["7"] } }
//! ```
//!
//! Two elements are `[input, expected output]`; one element is `[input]` and is checked by the catch-all
//! checker.

use std::collections::BTreeMap;

use thiserror::Error;

pub const MANIFEST_FILE: &str = "TESTS.json";

pub type RawManifest = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// One manifest test, with its arity already checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestCase {
    Static { input: String, output: String },
    Checker { input: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub pack: String,
    pub test: String,
    pub case: ManifestCase,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("test `{test}` in pack `{pack}` has {len} elements; expected [input] or [input, output]")]
    Arity { pack: String, test: String, len: usize },
}

/// Parse a manifest into entries, packs and tests in name order.
///
/// ## Errors
/// - [`ManifestError::Json`] when the text is not a `{pack: {test: [strings]}}` object.
/// - [`ManifestError::Arity`] for a test that is not one or two strings long.
pub fn parse(text: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
    let raw: RawManifest = serde_json::from_str(text)?;
    let mut entries = Vec::new();
    for (pack, tests) in raw {
        for (test, values) in tests {
            let len = values.len();
            let mut values = values.into_iter();
            let case = match (values.next(), values.next(), len) {
                (Some(input), Some(output), 2) => ManifestCase::Static { input, output },
                (Some(input), None, 1) => ManifestCase::Checker { input },
                _ => return Err(ManifestError::Arity { pack, test, len }),
            };
            entries.push(ManifestEntry {
                pack: pack.clone(),
                test,
                case,
            });
        }
    }
    Ok(entries)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn arity_picks_the_kind() {
        let entries = parse(r#"{"pack1": {"t1": ["5", "10"], "t2": ["7"]}}"#).unwrap();
        assert_eq!(
            entries,
            vec![
                ManifestEntry {
                    pack: "pack1".into(),
                    test: "t1".into(),
                    case: ManifestCase::Static {
                        input: "5".into(),
                        output: "10".into()
                    },
                },
                ManifestEntry {
                    pack: "pack1".into(),
                    test: "t2".into(),
                    case: ManifestCase::Checker { input: "7".into() },
                },
            ]
        );
    }

    #[test]
    fn bad_arity_is_an_error() {
        let err = parse(r#"{"p": {"t": ["a", "b", "c"]}}"#).unwrap_err();
        assert!(matches!(err, ManifestError::Arity { len: 3, .. }));
        let err = parse(r#"{"p": {"t": []}}"#).unwrap_err();
        assert!(matches!(err, ManifestError::Arity { len: 0, .. }));
    }

    #[test]
    fn wrong_shape_is_a_json_error() {
        assert!(matches!(parse(r#"{"t": ["a"]}"#), Err(ManifestError::Json(_))));
    }
}
