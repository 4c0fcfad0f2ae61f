use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Academic term a course instance was taken in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    #[serde(alias = "sp")]
    Spring,
    #[serde(alias = "sm")]
    Summer,
    #[serde(alias = "fa")]
    Fall,
}

impl Semester {
    /// Integer encoding used for grouping and chronological sorting.
    pub fn term(&self) -> u8 {
        match self {
            Self::Spring => 1,
            Self::Summer => 2,
            Self::Fall => 3,
        }
    }

    pub fn from_term(term: u8) -> Option<Self> {
        match term {
            1 => Some(Self::Spring),
            2 => Some(Self::Summer),
            3 => Some(Self::Fall),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Semester {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spring" | "sp" => Ok(Self::Spring),
            "summer" | "sm" => Ok(Self::Summer),
            "fall" | "fa" => Ok(Self::Fall),
            other => Err(format!("unknown semester '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_encoding() {
        assert_eq!(Semester::Spring.term(), 1);
        assert_eq!(Semester::Summer.term(), 2);
        assert_eq!(Semester::Fall.term(), 3);
        assert_eq!(Semester::from_term(3), Some(Semester::Fall));
        assert_eq!(Semester::from_term(0), None);
    }

    #[test]
    fn test_parse_short_and_long_ids() {
        assert_eq!("sp".parse::<Semester>().unwrap(), Semester::Spring);
        assert_eq!("Summer".parse::<Semester>().unwrap(), Semester::Summer);
        assert!("winter".parse::<Semester>().is_err());
    }

    #[test]
    fn test_serde_alias() {
        let semester: Semester = serde_json::from_str("\"fa\"").unwrap();
        assert_eq!(semester, Semester::Fall);
        assert_eq!(serde_json::to_string(&Semester::Fall).unwrap(), "\"fall\"");
    }
}
