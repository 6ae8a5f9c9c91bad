// Frequency mode lookup tables
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Spectrometer backend a frequency mode is measured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    AC1,
    AC2,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::AC1 => write!(f, "AC1"),
            Backend::AC2 => write!(f, "AC2"),
        }
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AC1" => Ok(Backend::AC1),
            "AC2" => Ok(Backend::AC2),
            other => anyhow::bail!("unknown backend: {}", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FreqModeStyle {
    pub colour: &'static str,
    pub text_colour: &'static str,
    pub backend: Option<Backend>,
    pub frequency_range: &'static str,
    pub species: &'static str,
}

/// Row of the frequency mode legend table.
#[derive(Debug, Clone, Serialize)]
pub struct FreqModeInfoRow {
    pub freqmode: u32,
    pub colour: &'static str,
    /// Absent for the unclassified mode 0.
    pub backend: Option<Backend>,
    pub frequency_range: &'static str,
    pub species: &'static str,
}

const DEFAULT_COLOUR: &str = "#101010";
const DEFAULT_TEXT_COLOUR: &str = "White";

static FREQMODES: Lazy<BTreeMap<u32, FreqModeStyle>> = Lazy::new(|| {
    use Backend::{AC1, AC2};

    let rows: [(u32, &str, &str, Option<Backend>, &str, &str); 18] = [
        (0, "#101010", "White", None, "unclassified", "-"),
        (1, "#E6E6FA", "Black", Some(AC2), "501.180 - 501.580, 501.980 - 502.380", "ClO, O3, N2O"),
        (2, "#4169E1", "White", Some(AC1), "544.100 - 544.902", "HNO3, O3"),
        (8, "#800080", "White", Some(AC2), "488.950 - 489.350, 488.35 - 488.750", "H2(18)O, O3, H2O"),
        (13, "#B22222", "White", Some(AC1), "556.598 - 557.398", "H2(16)O, O3"),
        (14, "#228B22", "White", Some(AC2), "576.062 - 576.862", "CO, O3"),
        (17, "#8B4513", "White", Some(AC2), "489.950 - 490.750", "HDO, (18)O3"),
        (19, "#C0C0C0", "Black", Some(AC1), "556.550 - 557.350", "H2O, O3"),
        (21, "#87CEEB", "Black", Some(AC1), "551.152 - 551.552, 551.752 - 552.152", "NO, O3, H2(17)O"),
        (22, "#000080", "White", Some(AC2), "576.254 - 576.654, 577.069 - 577.469", "CO, O3, HO2, (18)O3"),
        (23, "#663399", "White", Some(AC1), "488.350 - 488.750, 556.702 - 557.102", "H2(16)0, O3"),
        (24, "#008080", "White", Some(AC1), "576.062 - 576.862", "CO, O3"),
        (25, "#FFD700", "Black", Some(AC1), "502.998 - 504.198", "H2(16)O, O3"),
        (29, "#4682B4", "Black", Some(AC1), "499.400 - 499.800", "BrO"),
        (102, "#6495ED", "Black", Some(AC2), "544.100 - 544.902", "HNO3, O3"),
        (113, "#CD5C5C", "Black", Some(AC2), "556.598 - 557.398", "H2(16)O, O3"),
        (119, "#DCDCDC", "Black", Some(AC2), "556.550 - 557.350", "H2O, O3"),
        (121, "#B0E0E6", "Black", Some(AC2), "551.152 - 551.552, 551.752 - 552.152", "NO, O3, H2(17)O"),
    ];

    rows.into_iter()
        .map(|(fm, colour, text_colour, backend, frequency_range, species)| {
            (
                fm,
                FreqModeStyle {
                    colour,
                    text_colour,
                    backend,
                    frequency_range,
                    species,
                },
            )
        })
        .collect()
});

pub static MONTH_NAMES: [&str; 13] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
    "Undecimber",
];

/// Rainbow colour scale used for the overview map: blue, cyan, green, yellow, red, magenta.
pub static MOLOUR_SCALE: [&str; 6] = ["#2c5aa0", "#02c5aa", "#5aa02c", "#c5aa02", "#a02c5a", "#aa02c5"];

pub fn style(freqmode: u32) -> Option<&'static FreqModeStyle> {
    FREQMODES.get(&freqmode)
}

pub fn colour(freqmode: u32) -> &'static str {
    style(freqmode).map(|s| s.colour).unwrap_or(DEFAULT_COLOUR)
}

pub fn text_colour(freqmode: u32) -> &'static str {
    style(freqmode).map(|s| s.text_colour).unwrap_or(DEFAULT_TEXT_COLOUR)
}

/// Month name for 1-based month number (13 is the calendar's overflow bucket).
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
}

pub fn info_table() -> Vec<FreqModeInfoRow> {
    FREQMODES
        .iter()
        .map(|(fm, s)| FreqModeInfoRow {
            freqmode: *fm,
            colour: s.colour,
            backend: s.backend,
            frequency_range: s.frequency_range,
            species: s.species,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_freqmode() {
        assert_eq!(colour(2), "#4169E1");
        assert_eq!(text_colour(2), "White");
        assert_eq!(style(2).unwrap().backend, Some(Backend::AC1));
        assert_eq!(style(1).unwrap().backend, Some(Backend::AC2));
        assert_eq!(style(29).unwrap().species, "BrO");
    }

    #[test]
    fn test_lookup_unknown_freqmode_falls_back() {
        assert_eq!(colour(999), DEFAULT_COLOUR);
        assert_eq!(text_colour(999), DEFAULT_TEXT_COLOUR);
        assert!(style(999).is_none());
        assert_eq!(style(0).unwrap().backend, None);
    }

    #[test]
    fn test_backend_parse_and_display() {
        assert_eq!("AC2".parse::<Backend>().unwrap(), Backend::AC2);
        assert!("AC3".parse::<Backend>().is_err());
        assert_eq!(Backend::AC1.to_string(), "AC1");
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(13), Some("Undecimber"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(14), None);
    }

    #[test]
    fn test_info_table_is_ordered() {
        let table = info_table();
        assert_eq!(table.len(), 18);
        assert_eq!(table[0].freqmode, 0);
        assert_eq!(table.last().unwrap().freqmode, 121);
    }

    #[test]
    fn test_info_table_carries_backend() {
        let table = info_table();
        let by_mode = |fm: u32| table.iter().find(|r| r.freqmode == fm).unwrap();
        assert_eq!(by_mode(0).backend, None);
        assert_eq!(by_mode(2).backend, Some(Backend::AC1));
        assert_eq!(by_mode(102).backend, Some(Backend::AC2));

        let row = serde_json::to_value(by_mode(2)).unwrap();
        assert_eq!(row["backend"], "AC1");
    }
}
