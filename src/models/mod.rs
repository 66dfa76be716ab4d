mod month;
mod saved_year;

pub(crate) use month::Month;
pub(crate) use saved_year::SavedYear;
