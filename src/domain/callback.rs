use crate::error::{PaypalError, Result};
use serde::Serialize;

/// The raw form fields of an inbound IPN callback, in the order received.
///
/// PayPal expects the echo-back body to repeat the fields in their original
/// order, so this keeps a list of pairs instead of a map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CallbackFields(Vec<(String, String)>);

impl CallbackFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` request body.
    pub fn from_form_body(body: &str) -> Result<Self> {
        serde_urlencoded::from_str::<Vec<(String, String)>>(body.trim())
            .map(Self)
            .map_err(|e| PaypalError::InvalidInput(format!("malformed form body: {e}")))
    }

    /// Returns the value of `name`. When a field repeats, the last one wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CallbackFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
