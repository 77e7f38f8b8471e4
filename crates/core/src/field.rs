use std::ops::Deref;

/// Field values at a single instant, one per grid point.
///
/// A `FieldState` handed out by a solver is always an owned copy; it never
/// aliases the solver's live buffer. It dereferences to `[f64]` for read
/// access, but offers no mutable view.
///
/// With the `serde` feature it serializes as a sequence of numbers. JSON has
/// no NaN or infinity, so non-finite values are written as the strings
/// `"NaN"`, `"inf"` and `"-inf"` and read back from them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldState(Vec<f64>);

impl FieldState {
    /// Creates a field with every point set to `value`.
    #[must_use]
    pub fn uniform(point_count: usize, value: f64) -> Self {
        Self(vec![value; point_count])
    }

    /// Creates a field by evaluating `f` at each position.
    pub fn from_fn(positions: &[f64], f: impl Fn(f64) -> f64) -> Self {
        Self(positions.iter().map(|&x| f(x)).collect())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Consumes the field and returns the underlying values.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Returns `true` if every value is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Largest absolute value, or `None` for an empty field.
    ///
    /// NaN values are ignored.
    #[must_use]
    pub fn max_abs(&self) -> Option<f64> {
        self.0
            .iter()
            .filter(|v| !v.is_nan())
            .map(|v| v.abs())
            .reduce(f64::max)
    }

    /// Index of the first non-finite value, if any.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<usize> {
        self.0.iter().position(|v| !v.is_finite())
    }
}

impl Deref for FieldState {
    type Target = [f64];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<f64>> for FieldState {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for FieldState {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl FromIterator<f64> for FieldState {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
mod encoding {
    use std::fmt;

    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    use super::FieldState;

    /// One field value with an explicit encoding for non-finite values.
    struct Number(f64);

    impl Serialize for Number {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let value = self.0;
            if value.is_finite() {
                serializer.serialize_f64(value)
            } else if value.is_nan() {
                serializer.serialize_str("NaN")
            } else if value > 0.0 {
                serializer.serialize_str("inf")
            } else {
                serializer.serialize_str("-inf")
            }
        }
    }

    struct NumberVisitor;

    impl de::Visitor<'_> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(r#"a number, "NaN", "inf" or "-inf""#)
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(value)
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(value as f64)
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            match value {
                "NaN" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                _ => Err(E::invalid_value(de::Unexpected::Str(value), &self)),
            }
        }
    }

    impl<'de> Deserialize<'de> for Number {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(NumberVisitor).map(Number)
        }
    }

    impl Serialize for FieldState {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.0.iter().map(|&v| Number(v)))
        }
    }

    impl<'de> Deserialize<'de> for FieldState {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let values = Vec::<Number>::deserialize(deserializer)?;
            Ok(values.into_iter().map(|Number(v)| v).collect())
        }
    }
}
