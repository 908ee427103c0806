//! Action Planner - goal to research, plan and launch assets
//!
//! A brief (goal, audience, constraints) goes through three generation
//! stages against an OpenAI-compatible chat-completions service. Each stage
//! returns a JSON document with a strict contract; a contract violation gets
//! one stricter retry before the stage fails.
//!
//! # Modules
//!
//! - [`llm`] - generation-service client trait and OpenAI-compatible implementation
//! - [`schema`] - document contracts, validation and risk normalization
//! - [`prompts`] - Handlebars prompt templates with on-disk overrides
//! - [`pipeline`] - stages, session store and orchestrator
//! - [`deliver`] - launch pack, email and calendar exports
//! - [`presets`] - built-in briefs
//! - [`repl`] - interactive session
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod deliver;
pub mod llm;
pub mod pipeline;
pub mod presets;
pub mod prompts;
pub mod repl;
pub mod schema;

// Re-export commonly used types
pub use config::{Config, LlmConfig, SmtpConfig, StageConfig, StagesConfig};
pub use deliver::{DeliveryError, EmailDraft, SmtpSender};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use pipeline::{Brief, Orchestrator, RunReport, Session, Stage, StageError, StageOutcome, StageStatus};
pub use prompts::{PromptContext, PromptLoader};
pub use schema::{AssetsDoc, PlanDoc, ResearchDoc, RiskItem, SchemaValidationError};
