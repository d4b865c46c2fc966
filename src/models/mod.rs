mod category;
mod entry;
mod month;

pub use category::{Category, CategoryId};
pub use entry::Entry;
pub use month::{MonthBucket, YearMonth};
