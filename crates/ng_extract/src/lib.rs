pub mod dates;
pub mod extractor;
pub mod profiles;

pub use dates::{start_of_day, DateNormalizer};
pub use extractor::{ArticleExtractor, MISSING_TITLE};
pub use profiles::ExtractionProfile;
