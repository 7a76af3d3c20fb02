use std::fs;
use std::path::Path;
use std::time::Instant;

use log::debug;

use abp_compiler::{build_rule_set_with_stats, parse_filter_list};
use abp_core::{BuildOptions, Rule, RuleSet};

#[derive(Debug, Clone)]
pub struct LoadStats {
    pub lines: usize,
    pub rules_before: usize,
    pub rules_after: usize,
    pub total_ms: f64,
}

/// Read and parse filter lists, then hand the rules to the builder.
pub fn load_rule_set(inputs: &[String], options: &BuildOptions, verbose: bool) -> Result<(RuleSet, LoadStats), String> {
    if inputs.is_empty() {
        return Err("No input files specified".to_string());
    }

    let start = Instant::now();
    let mut all_rules: Vec<Rule> = Vec::new();
    let mut total_lines = 0usize;

    for (list_id, path) in inputs.iter().enumerate() {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {}", path, e))?;

        let line_count = content.lines().count();
        total_lines += line_count;

        let rules = parse_filter_list(&content, options.invalid_rules)
            .map_err(|e| format!("Failed to parse '{}': {}", path, e))?;

        if verbose {
            println!(
                "  [{}] {} - {} lines, {} rules",
                list_id,
                Path::new(path).file_name().unwrap_or_default().to_string_lossy(),
                line_count,
                rules.len()
            );
        }

        all_rules.extend(rules);
    }

    let (rule_set, optimize_stats) = build_rule_set_with_stats(all_rules, options)
        .map_err(|e| format!("Failed to build rule set: {}", e))?;
    debug!(
        "Deduplicated {} rules ({} -> {})",
        optimize_stats.deduped, optimize_stats.before, optimize_stats.after
    );

    let stats = LoadStats {
        lines: total_lines,
        rules_before: optimize_stats.before,
        rules_after: optimize_stats.after,
        total_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    Ok((rule_set, stats))
}

/// Load build options from a JSON file, or defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<BuildOptions, String> {
    let Some(path) = path else {
        return Ok(BuildOptions::default());
    };

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("Invalid config '{}': {}", path.display(), e))
}
