//! User-configurable decoding options.

use serde::{Deserialize, Serialize};

/// Output representation of `interval` columns.
///
/// A schema uses one representation for all of its interval columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalRepresentation {
    /// `Interval(MonthDayNano)`: months, days and nanoseconds kept apart.
    #[default]
    MonthDayNano,
    /// `Duration(Microsecond)`: days folded into microseconds at 24h per day.
    /// Months are discarded.
    Duration,
}

/// Options applied when resolving column types into decoders.
///
/// None of the options alter how the wire bytes are parsed; they select the
/// Arrow representation of the decoded values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserOptions {
    /// Produce `Dictionary(Int32, Utf8)` instead of `LargeUtf8` for text and enum
    /// columns.
    pub string_as_dictionary: bool,
    pub interval_representation: IntervalRepresentation,
    /// Precision of `numeric` columns declared without a modifier.
    pub default_numeric_precision: u8,
    /// Scale of `numeric` columns declared without a modifier.
    pub default_numeric_scale: i8,
}

impl Default for UserOptions {
    fn default() -> Self {
        UserOptions {
            string_as_dictionary: false,
            interval_representation: IntervalRepresentation::MonthDayNano,
            default_numeric_precision: 22,
            default_numeric_scale: 6,
        }
    }
}

impl UserOptions {
    pub fn with_string_as_dictionary(mut self, value: bool) -> Self {
        self.string_as_dictionary = value;
        self
    }

    pub fn with_interval_representation(mut self, value: IntervalRepresentation) -> Self {
        self.interval_representation = value;
        self
    }

    pub fn with_default_numeric(mut self, precision: u8, scale: i8) -> Self {
        self.default_numeric_precision = precision;
        self.default_numeric_scale = scale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{IntervalRepresentation, UserOptions};

    #[test]
    fn test_partial_options_from_json() {
        let options: UserOptions =
            serde_json::from_str(r#"{"interval_representation": "duration"}"#).unwrap();
        assert_eq!(
            options,
            UserOptions::default().with_interval_representation(IntervalRepresentation::Duration)
        );
        assert_eq!(options.default_numeric_precision, 22);
    }
}
