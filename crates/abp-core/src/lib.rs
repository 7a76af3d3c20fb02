//! ABP Rules Core Library
//!
//! This crate provides the rule model and the matching engine for AdBlock Plus
//! network filters.
//!
//! # Architecture
//!
//! Rules are parsed by `abp-compiler` into immutable [`Rule`] values. A
//! [`RuleSet`] partitions them by matching strategy: option-free rules are
//! OR-joined into one combined matcher per action, rules with options are
//! evaluated one at a time against a caller supplied [`RequestContext`].
//! Exceptions are always checked before blocking rules.
//!
//! # Modules
//!
//! - `types`: Rule kinds, option values and the request context
//! - `config`: Build configuration (supported options, engine, memory ceiling)
//! - `domain`: Domain suffix walking for `$domain=` resolution
//! - `rule`: A single parsed rule and its option evaluator
//! - `engine`: Combined matcher construction for option-free rules
//! - `ruleset`: Partitioned rule collection and the blocking decision
//! - `error`: Error taxonomy

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod rule;
pub mod ruleset;
pub mod types;

// Re-export commonly used types
pub use config::{BuildOptions, InvalidRulePolicy, MatcherEngine};
pub use domain::domain_variants;
pub use engine::CombinedMatcher;
pub use error::{FilterError, ParseError};
pub use rule::{Rule, UrlPattern};
pub use ruleset::{RuleSet, RuleSetStats};
pub use types::{ContextValue, DomainQualifier, OptionValue, RequestContext, RuleKind, RuleOptions};
