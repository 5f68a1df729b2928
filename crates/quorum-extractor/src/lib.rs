//! Quorum Extractor
//!
//! Turns a finalized meeting transcript into the structured values of a
//! decision card.
//!
//! # Overview
//!
//! Extraction is keyword matching, not language understanding:
//!
//! - **Decision**: text after "decide to", "we will" or "we should", else the
//!   first sentence
//! - **Owner**: text after "owner is", else empty
//! - **Status**: first of approved / pending / review found, else Proposed
//! - **Confidence**: grows with word count, clamped to a configured band
//!
//! # Architecture
//!
//! ```text
//! Transcript → TranscriptExtractor → TranscriptAnalysis → Board (quorum-store)
//! ```
//!
//! The free functions in this crate are stateless and use the default
//! confidence band. [`TranscriptExtractor`] carries an [`ExtractorConfig`] for
//! callers that need a different band.
//!
//! # Example Usage
//!
//! ```
//! use quorum_extractor::{extract_decision, extract_owner, TranscriptExtractor};
//! use quorum_domain::DecisionStatus;
//!
//! let text = "We decide to ship the beta. The owner is Priya. Approved.";
//! assert_eq!(extract_decision(text), "ship the beta");
//! assert_eq!(extract_owner(text), "Priya");
//!
//! let analysis = TranscriptExtractor::default().analyze(text);
//! assert_eq!(analysis.status, DecisionStatus::Approved);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod patterns;
mod types;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use patterns::{estimate_confidence, extract_decision, extract_owner, extract_status};
pub use types::{TranscriptAnalysis, TranscriptExtractor};
