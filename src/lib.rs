// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::manual_find)]
#![allow(clippy::match_like_matches_macro)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Resume Oxide
//!
//! Deterministic resume extraction: evidence-backed candidate profiles from
//! corrupted PDF/DOCX text with per-field confidence.
//!
//! ## Core Features
//!
//! - **Rule-based extraction**: regexes, keyword vocabularies, and positional
//!   heuristics only — no ML, fully reproducible output
//! - **Corruption repair**: spaced-out characters (`J O H N`), glued words
//!   (`TERRITORYMANAGER`), mid-word breaks (`Improv ed`), and fragmented
//!   bullet text are repaired before field extraction
//! - **Geometric reconstruction**: PDF character clouds are rebuilt into
//!   words and lines with a self-tuning gap tolerance
//! - **Evidence map**: every extracted field links back to the exact source
//!   lines it came from
//! - **Confidence scoring**: per-field confidence with extraction-method
//!   labels, plus an overall high/medium/low parse quality
//!
//! ## Architecture
//!
//! Lines flow through a fixed pipeline: contact anchors (phone, then email),
//! name, location, links, skills, section detection, experience and education
//! grouping/parsing, an education safety net, and a final reclassification
//! pass that keeps education entries out of the experience list.
//!
//! ## Quick Start
//!
//! ```
//! use resume_oxide::pipeline::ResumePipeline;
//! use resume_oxide::schema::SourceKind;
//!
//! # fn main() -> Result<(), resume_oxide::error::Error> {
//! let pipeline = ResumePipeline::new();
//! let response = pipeline.parse_text(
//!     "JOHN DOE\nNew York, New York\njohn.doe@example.com | (555) 123-4567",
//!     SourceKind::Text,
//! )?;
//!
//! let profile = &response.candidate_profile;
//! assert_eq!(profile.full_name.as_deref(), Some("John Doe"));
//! assert_eq!(profile.email.as_deref(), Some("john.doe@example.com"));
//! println!("{}", response.to_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

// Error handling
pub mod error;

// Output contract and shared vocabulary
pub mod schema;
pub mod vocab;

// Text repair and normalization
pub mod normalize;

// Geometric line reconstruction for PDF character input
pub mod geometry;

// Section detection and entry grouping
pub mod segmenter;

// Field extraction
pub mod extractors;

// Entry parsing and reclassification
pub mod parsers;

// Confidence scoring
pub mod confidence;

// Orchestration
pub mod pipeline;

pub use error::{Error, Result};
pub use pipeline::ResumePipeline;
pub use schema::{
    CandidateProfile, EducationEntry, EvidenceItem, ExperienceEntry, FieldConfidence,
    ParseQuality, ParseResponse, SourceKind, SourceLine,
};
pub use vocab::Vocabulary;
