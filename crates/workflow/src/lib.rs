//! Evaluation workflow: select a workbook, assemble it, ask the evaluator,
//! keep the outcome.
//!
//! No GUI or terminal concepts. Front ends read the state and drive the
//! transitions.

mod file;
mod machine;

pub use dss_io::Variant;
pub use file::SelectedFile;
pub use machine::{ParseJob, RequestJob, Stage, Ticket, Workflow, WorkflowError};
