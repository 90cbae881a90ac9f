use crate::domain::validation::ValidationError;
use crate::domain::value::Destination;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One destination number or an ordered collection of them.
///
/// Conversions exist for single string-likes and for vectors, slices, and
/// arrays of them, so the send operations accept either shape directly.
/// Values are held exactly as supplied; normalization happens when a send
/// operation runs.
pub struct Destinations(Vec<String>);

impl Destinations {
    /// The raw values as supplied, in order.
    pub fn raw(&self) -> &[String] {
        &self.0
    }

    /// Normalize every value, preserving order.
    ///
    /// Fails with [`ValidationError::InvalidDestination`] carrying the first
    /// offending input, unstripped. An empty collection normalizes to an
    /// empty list.
    pub fn normalize(&self) -> Result<Vec<Destination>, ValidationError> {
        self.0
            .iter()
            .map(|raw| Destination::new(raw.as_str()))
            .collect()
    }
}

impl From<&str> for Destinations {
    fn from(value: &str) -> Self {
        Self(vec![value.to_owned()])
    }
}

impl From<String> for Destinations {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<String>> for Destinations {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<Vec<&str>> for Destinations {
    fn from(values: Vec<&str>) -> Self {
        Self(values.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for Destinations {
    fn from(values: &[&str]) -> Self {
        Self(values.iter().map(|value| (*value).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Destinations {
    fn from(values: [&str; N]) -> Self {
        Self(values.iter().map(|value| (*value).to_owned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_from_single_values_and_collections() {
        let single = Destinations::from("555-1111");
        assert_eq!(single.raw(), ["555-1111".to_owned()]);

        let many = Destinations::from(vec!["555-1111", "555-2222"]);
        assert_eq!(many.raw().len(), 2);

        let array = Destinations::from(["555-1111", "555-2222"]);
        assert_eq!(array.raw(), many.raw());
    }

    #[test]
    fn normalize_preserves_order() {
        let destinations = Destinations::from(vec!["555-1111", "+1 (555) 123-4567"]);
        let normalized = destinations.normalize().unwrap();
        assert_eq!(normalized[0].as_str(), "5551111");
        assert_eq!(normalized[1].as_str(), "+15551234567");
    }

    #[test]
    fn normalize_accepts_an_empty_collection() {
        let destinations = Destinations::from(Vec::<String>::new());
        assert_eq!(destinations.normalize().unwrap(), Vec::new());
    }

    #[test]
    fn normalize_fails_on_the_first_bad_value() {
        let destinations = Destinations::from(vec!["555-1111", "abc"]);
        let err = destinations.normalize().unwrap_err();
        match err {
            ValidationError::InvalidDestination { input } => assert_eq!(input, "abc"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
