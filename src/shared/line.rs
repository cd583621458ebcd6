use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// The closed set of transit lines the dashboard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Line {
    #[serde(rename = "LRT1")]
    Lrt1,
    #[serde(rename = "LRT2")]
    Lrt2,
    #[serde(rename = "MRT3")]
    Mrt3,
}

impl Line {
    pub const ALL: [Line; 3] = [Line::Lrt1, Line::Lrt2, Line::Mrt3];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Line::Lrt1 => "LRT1",
            Line::Lrt2 => "LRT2",
            Line::Mrt3 => "MRT3",
        }
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Line {
    type Err = String;

    /// Accepts the canonical code in any case, ignoring spaces and dashes
    /// ("LRT-1", "lrt 1").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect::<String>()
            .to_uppercase();
        Line::ALL
            .into_iter()
            .find(|line| line.as_str() == code)
            .ok_or_else(|| s.to_string())
    }
}

#[test]
fn line_parse_test() {
    assert_eq!("LRT1".parse::<Line>(), Ok(Line::Lrt1));
    assert_eq!("lrt-2".parse::<Line>(), Ok(Line::Lrt2));
    assert_eq!(" MRT 3 ".parse::<Line>(), Ok(Line::Mrt3));
    assert!("MRT7".parse::<Line>().is_err());
}
