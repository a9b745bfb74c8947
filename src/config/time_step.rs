use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Compositing period of a Level-3 product.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeStep {
    #[serde(rename(deserialize = "daily"))]
    Daily,
    #[serde(rename(deserialize = "eight_day"))]
    EightDay,
    #[serde(rename(deserialize = "monthly"))]
    Monthly,
}

impl TimeStep {
    /// Period code used in OB.DAAC granule names (`DAY`, `8D`, `MO`).
    pub fn code(&self) -> &'static str {
        match self {
            TimeStep::Daily => "DAY",
            TimeStep::EightDay => "8D",
            TimeStep::Monthly => "MO",
        }
    }
}

impl FromStr for TimeStep {
    type Err = TimeStepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAY" | "daily" => Ok(TimeStep::Daily),
            "8D" | "eight_day" => Ok(TimeStep::EightDay),
            "MO" | "monthly" => Ok(TimeStep::Monthly),
            _ => Err(TimeStepParseError(s.to_string())),
        }
    }
}

impl fmt::Display for TimeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug)]
pub struct TimeStepParseError(String);

impl fmt::Display for TimeStepParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid time step: {}", self.0)
    }
}

impl std::error::Error for TimeStepParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_granule_codes() {
        assert_eq!("DAY".parse::<TimeStep>().unwrap(), TimeStep::Daily);
        assert_eq!("8D".parse::<TimeStep>().unwrap(), TimeStep::EightDay);
        assert_eq!("MO".parse::<TimeStep>().unwrap(), TimeStep::Monthly);
        assert!("YR".parse::<TimeStep>().is_err());
    }

    #[test]
    fn test_code_round_trips_through_display() {
        for step in [TimeStep::Daily, TimeStep::EightDay, TimeStep::Monthly] {
            assert_eq!(step.to_string().parse::<TimeStep>().unwrap(), step);
        }
    }
}
