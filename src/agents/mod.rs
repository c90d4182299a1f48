//! Agent System
//!
//! The two places the service talks to the completion client:
//!
//! - **File Query Agent**: answers a question about the session's uploaded
//!   file with a generic assistant persona
//! - **Statistics Agent**: answers a freeform question with a
//!   statistics-specialist persona
//!
//! ## Flow
//!
//! ```text
//!  upload ──► extracted text ─┐
//!                             ▼
//!  query ──────────────► File Query Agent ──► assistant turn
//!
//!  message ──► user turn ──► Statistics Agent ──► assistant turn
//! ```
//!
//! The agents are deliberately separate: a file-accompanied query never sees
//! the specialist persona, and only the freeform path records the user turn.

pub mod file_query;
pub mod statistics;

pub use file_query::FileQueryAgent;
pub use statistics::StatisticsAgent;

/// Persona used when answering questions about an uploaded file.
pub const ASSISTANT_PERSONA: &str = "You are a helpful assistant.";

/// Persona used for freeform statistics questions.
pub const STATISTICS_PERSONA: &str = "You are a knowledgeable AI assistant specializing in solving statistical problems. You provide clear explanations, perform data analysis, interpret results, and assist with statistical software like R, Python, and SPSS. You help users with hypothesis testing, inferential statistics, regression analysis, structural equation modeling, meta-analysis, and other statistical methods.";
