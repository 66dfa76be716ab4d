#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub(crate) fn all() -> &'static [Month; 12] {
        &[
            Self::January,
            Self::February,
            Self::March,
            Self::April,
            Self::May,
            Self::June,
            Self::July,
            Self::August,
            Self::September,
            Self::October,
            Self::November,
            Self::December,
        ]
    }

    /// Zero-based position in the calendar year (January = 0).
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub(crate) fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    pub(crate) fn short_name(self) -> &'static str {
        &self.as_str()[..3]
    }

    /// Accepts `1`..`12`, three-letter abbreviations and full names, case-insensitive.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if let Ok(number) = trimmed.parse::<usize>() {
            return number.checked_sub(1).and_then(Self::from_index);
        }
        let lower = trimmed.to_lowercase();
        if lower.len() < 3 {
            return None;
        }
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str().to_lowercase().starts_with(&lower))
    }

    /// Row label: month abbreviation and two-digit year, e.g. `"Feb 24"`.
    pub(crate) fn label(self, year: i32) -> String {
        format!("{} {:02}", self.short_name(), year.rem_euclid(100))
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
