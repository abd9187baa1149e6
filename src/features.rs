//! The thirteen Boston housing features submitted for a price estimate.
//!
//! A [`FeatureSet`] always carries every feature. Edits produce a new set
//! instead of mutating the existing one, so a snapshot handed out earlier
//! never changes underneath its holder.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of features the prediction model expects.
pub const FEATURE_COUNT: usize = 13;

/// One named model input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureName {
    Crim,
    Zn,
    Indus,
    Chas,
    Nox,
    Rm,
    Age,
    Dis,
    Rad,
    Tax,
    Ptratio,
    B,
    Lstat,
}

impl FeatureName {
    /// Every feature, in the column order the model was trained on.
    pub const ALL: [FeatureName; FEATURE_COUNT] = [
        Self::Crim,
        Self::Zn,
        Self::Indus,
        Self::Chas,
        Self::Nox,
        Self::Rm,
        Self::Age,
        Self::Dis,
        Self::Rad,
        Self::Tax,
        Self::Ptratio,
        Self::B,
        Self::Lstat,
    ];

    /// Wire spelling used as the JSON key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Crim => "CRIM",
            Self::Zn => "ZN",
            Self::Indus => "INDUS",
            Self::Chas => "CHAS",
            Self::Nox => "NOX",
            Self::Rm => "RM",
            Self::Age => "AGE",
            Self::Dis => "DIS",
            Self::Rad => "RAD",
            Self::Tax => "TAX",
            Self::Ptratio => "PTRATIO",
            Self::B => "B",
            Self::Lstat => "LSTAT",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Crim => "Per capita crime rate by town",
            Self::Zn => "Proportion of residential land zoned for lots over 25,000 sq.ft.",
            Self::Indus => "Proportion of non-retail business acres per town",
            Self::Chas => "Charles River dummy variable (1 if tract bounds river; 0 otherwise)",
            Self::Nox => "Nitric oxides concentration (parts per 10 million)",
            Self::Rm => "Average number of rooms per dwelling",
            Self::Age => "Proportion of owner-occupied units built prior to 1940",
            Self::Dis => "Weighted distances to five Boston employment centres",
            Self::Rad => "Index of accessibility to radial highways",
            Self::Tax => "Full-value property-tax rate per $10,000",
            Self::Ptratio => "Pupil-teacher ratio by town",
            Self::B => "1000(Bk - 0.63)^2 where Bk is the proportion of Black people by town",
            Self::Lstat => "% lower status of the population",
        }
    }

    /// Sample value a fresh form starts with.
    pub fn default_value(self) -> f64 {
        match self {
            Self::Crim => 0.00632,
            Self::Zn => 18.0,
            Self::Indus => 2.31,
            Self::Chas => 0.0,
            Self::Nox => 0.538,
            Self::Rm => 6.575,
            Self::Age => 65.2,
            Self::Dis => 4.09,
            Self::Rad => 1.0,
            Self::Tax => 296.0,
            Self::Ptratio => 15.3,
            Self::B => 396.9,
            Self::Lstat => 4.98,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a name does not match any of the thirteen features.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Unknown feature '{0}'; expected one of \
     CRIM, ZN, INDUS, CHAS, NOX, RM, AGE, DIS, RAD, TAX, PTRATIO, B, LSTAT"
)]
pub struct UnknownFeature(pub String);

impl FromStr for FeatureName {
    type Err = UnknownFeature;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|name| name.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownFeature(trimmed.to_string()))
    }
}

impl Serialize for FeatureName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for FeatureName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse raw numeric input, coercing anything unusable to zero.
///
/// Empty, non-numeric, NaN and infinite input all become `0.0`; nothing is
/// reported back to the caller.
pub fn parse_feature_input(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// A complete set of feature values.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureSet {
    values: [f64; FEATURE_COUNT],
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self {
            values: FeatureName::ALL.map(FeatureName::default_value),
        }
    }
}

impl FeatureSet {
    /// A set with every feature at zero.
    pub fn zeroed() -> Self {
        Self {
            values: [0.0; FEATURE_COUNT],
        }
    }

    /// Default sample values with the given overrides applied.
    pub fn with_overrides(overrides: &BTreeMap<FeatureName, f64>) -> Self {
        overrides
            .iter()
            .fold(Self::default(), |set, (&name, &value)| {
                set.with_value(name, value)
            })
    }

    pub fn get(&self, name: FeatureName) -> f64 {
        self.values[name.index()]
    }

    /// Return a copy with one value replaced; the other twelve are untouched.
    pub fn with_value(&self, name: FeatureName, value: f64) -> Self {
        let mut values = self.values;
        values[name.index()] = if value.is_finite() { value } else { 0.0 };
        Self { values }
    }

    /// Return a copy with one value replaced by parsed raw input.
    pub fn with_input(&self, name: FeatureName, raw: &str) -> Self {
        self.with_value(name, parse_feature_input(raw))
    }

    /// Iterate features in model column order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FeatureName::ALL
            .into_iter()
            .map(|name| (name, self.get(name)))
    }
}

impl Serialize for FeatureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name.key(), &value)?;
        }
        map.end()
    }
}
