//! # promptreg
//!
//! File-backed prompt registry and prompt templates for LLM applications in Rust
//!
//! ## Why `promptreg`
//!
//! Prompts are artifacts. They get reviewed, versioned and swapped like any other file, so they should live in files
//! next to a catalog that says which version of which prompt is current, instead of being string literals scattered
//! across the code that calls the model.
//!
//! ## Concepts and Design
//!
//! ### Registry and Catalog
//!
//! A prompts directory holds a catalog, `registry.yaml`, and the prompt files:
//!
//! ```text
//! agents:
//!   pull_request_creator:
//!     current_version: v2
//!     path: pull_request_creator/v2.txt
//!     description: Writes pull request descriptions
//!     model: gpt-4o-mini
//! ```
//!
//! Every prompt is declared under the `agents` key with the required `current_version`, `path` and `description`
//! and an optional `model` hint. A [`PromptRegistry`](crate::registry::PromptRegistry) loads the catalog once and
//! resolves identifiers to [`PromptInfo`](crate::registry::PromptInfo) descriptors, checking on each lookup that
//! the entry is complete and that its file exists. Failures are
//! [`RegistryError`](crate::registry::RegistryError)s naming the identifiers, fields or paths involved.
//!
//! The registry is a plain value. There is no global instance; construct it where the application starts and pass
//! it along.
//!
//! ### Prompt Template and Placeholder
//!
//! The file behind a `PromptInfo` is loaded as a [`PromptTemplate`](crate::prompt::PromptTemplate), a text
//! with placeholders such as
//!
//! ```text
//! Write a pull request description for branch {branch_name}. Reply as {{"title": ..., "body": ...}}.
//! ```
//!
//! `{branch_name}` is a placeholder, a slot to be filled, with the name `"branch_name"`. Doubled braces are literal
//! braces.
//!
//! ### Partial Prompt
//!
//! A partial prompt is an incomplete construction of a template: some of its slots are still empty. It comes only
//! from `PromptTemplate::construct_prompt`, records the value of every filled placeholder, and turns into the final
//! prompt string via `PartialPrompt::complete` once nothing is left unfilled.
//!
//! ### Filler
//!
//! Anything that fills one or more placeholders in a partial prompt, i.e. anything that implements
//! [`FillPlaceholders`](crate::filler::FillPlaceholders) and [`Fill`](crate::filler::Fill).
//! [`MapFiller`](crate::filler::MapFiller) fills from a map of variables.
//!
//! ## Example
//!
//! ```no_run
//! use promptreg::filler::MapFiller;
//! use promptreg::registry::PromptRegistry;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = PromptRegistry::with_defaults()?;
//! let mut prompt = registry.load_template("pull_request_creator")?.construct_prompt();
//! prompt.apply(&MapFiller::from([("branch_name", "feature/add-cache-system")]))?;
//! println!("{}", prompt.complete()?);
//! # Ok(())
//! # }
//! ```


pub mod catalog;
pub mod registry;
pub mod prompt;
pub mod filler;
pub mod utils;
