//! The strategy advisor's reasoning loop.
//!
//! One user message in, one outcome out: either a final answer or a
//! deliberate abort when the tool-calling budget runs dry.

pub mod complexity;
pub mod loop_runner;
pub mod prompts;

pub use loop_runner::{AgentLoop, TurnOutcome};
