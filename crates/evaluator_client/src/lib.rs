//! Remote evaluator client, shared between the workflow and the CLI.
//!
//! The evaluator owns all scoring. This crate only ships a decision document
//! to it and turns the answer (or the lack of one) into a typed outcome.

mod client;

pub use client::{
    Evaluator, EvaluatorClient, EvaluatorConfig, EvaluatorError,
    TRANSPORT_MESSAGE, UNKNOWN_REMOTE_MESSAGE,
};
