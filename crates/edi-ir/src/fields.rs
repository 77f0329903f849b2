//! Decoded segment values

use std::collections::BTreeMap;

/// Decoded values of one segment, keyed by field name.
///
/// Ordered so that trees compare and serialize deterministically.
pub type Fields = BTreeMap<String, String>;

/// Control number field shared by ISA/IEA, GS/GE and ST/SE.
pub const CONTROL_NUMBER: &str = "control_number";

/// Transaction set identifier carried by ST (e.g. `850`).
pub const IDENTIFIER_CODE: &str = "identifier_code";

/// Count field carried by the SE, GE and IEA trailers.
pub const TOTAL: &str = "total";

/// Build a [`Fields`] map from `(name, value)` pairs.
pub fn fields_from<I, K, V>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Read a field, treating an empty value the same as a missing one.
pub fn non_empty<'a>(fields: &'a Fields, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}
