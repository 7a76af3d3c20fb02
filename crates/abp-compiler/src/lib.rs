//! ABP Filter List Compiler
//!
//! This crate parses AdBlock Plus filter lists and builds queryable rule sets.

pub mod parser;
pub mod pattern;
pub mod optimizer;
pub mod builder;

pub use builder::{build_rule_set, build_rule_set_from_text, build_rule_set_with_stats, RuleInput};
pub use optimizer::{optimize_rules, OptimizeStats};
pub use parser::{parse_domain_option, parse_filter_list, parse_option, parse_rule, split_options};
pub use pattern::compile_pattern;
