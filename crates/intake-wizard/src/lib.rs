//! Upload wizard: a three-step state machine that takes a tabular file from
//! upload through column mapping to a submitted package.
//!
//! 1. Source upload: accept a file, name the upload
//! 2. Column mapping: auto-suggest, apply a template, or map by hand until
//!    every required field is covered
//! 3. Review and submit, optionally saving the mapping as a template

pub mod error;
pub mod profile;
pub mod review;
pub mod session;
pub mod step;
pub mod submit;
pub mod suggest;

pub use error::{Blocker, Result, SubmitError, WizardError};
pub use profile::{DocumentRequirement, DocumentSource, WizardProfile};
pub use review::{DocumentSummary, ReviewEntry, ReviewSummary, TemplateDraft};
pub use session::{
    DuplicateTarget, RequiredFieldStatus, SuggestOutcome, SuggestTicket, WizardSession,
};
pub use step::{TOTAL_STEPS, WizardStep};
pub use submit::{SubmissionPackage, SubmissionReceipt, SubmitFailure, Submitter};
pub use suggest::auto_suggest;
