//! Entry parsers: grouped line blocks into structured experience and
//! education entries, plus the final experience-to-education routing pass.

mod education;
mod experience;
mod reclassify;

pub use education::{
    classify_entry_as_education, extract_degree_from_text,
    extract_field_of_study_from_degree_line, looks_like_education_line, parse_education_entry,
};
pub use experience::{parse_experience_entry, parse_single_line_experience, SingleLineParts};
pub use reclassify::{
    convert_experience_to_education, looks_like_education_entry, merge_education_entries,
    split_experience_and_education,
};
