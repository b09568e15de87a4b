//! Field extractors: anchor-based detectors for the scalar and collection
//! profile fields. Each extractor independently scans the line sequence and
//! reports its value together with the evidence lines it used.

mod contact;
mod links;
mod location;
mod name;
mod skills;

pub use contact::{extract_email, extract_email_flexible, extract_phone, ContactHit};
pub use links::{extract_links, LinksHit};
pub use location::{extract_location, LocationHit};
pub use name::{extract_name, NameHit};
pub use skills::{extract_skills, SkillsHit};
