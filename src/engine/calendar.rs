use super::{EngineError, EngineResult};

const MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Gregorian rule: every fourth year, except centuries not divisible by 400.
pub(crate) fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Lengths of January..December for `year`.
pub(crate) fn month_lengths(year: i32) -> EngineResult<[u32; 12]> {
    if year <= 0 {
        return Err(EngineError::invalid(format!(
            "year must be a positive integer, got {year}"
        )));
    }
    let mut lengths = MONTH_LENGTHS;
    if is_leap_year(year) {
        lengths[1] = 29;
    }
    Ok(lengths)
}

pub(crate) fn days_in_year(year: i32) -> EngineResult<u32> {
    Ok(month_lengths(year)?.iter().sum())
}
