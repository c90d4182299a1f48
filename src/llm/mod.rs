// LLM abstraction layer

pub mod provider;
pub mod openai;

#[cfg(test)]
pub(crate) mod stub;

pub use provider::*;
pub use crate::types::*;
