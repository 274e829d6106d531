//! Per-file pipeline: declarations, key trees, references, marks and rules.
//!
//! For every translate declaration of a module the stages run strictly in
//! order: build the tree, resolve all references, mark, then report.

use std::sync::Arc;

use anyhow::Result;
use swc_common::SourceMap;
use tracing::debug;

use crate::core::collect::{TranslateDeclaration, collect_translate_declarations};
use crate::core::mark::mark;
use crate::core::parsers::jsx::{ParsedJSX, parse_jsx_source};
use crate::core::resolve::resolve;
use crate::core::tree::{KeyTreeBuild, build_from_call};
use crate::core::Locator;
use crate::issues::{BuildErrorFinding, Finding, Severity};
use crate::rules::check_reachability;

/// Settings that change what a file analysis reports.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub translate_functions: Vec<String>,
    /// Severity of opaque reach findings, `None` to skip them.
    pub opaque_severity: Option<Severity>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            translate_functions: vec!["translate".to_string()],
            opaque_severity: Some(Severity::Info),
        }
    }
}

/// Findings of one source file.
#[derive(Debug, Default)]
pub struct FileAnalysis {
    /// Number of translate declarations found.
    pub declarations: usize,
    pub findings: Vec<Finding>,
}

/// Analyze an already parsed module.
pub fn analyze_module(parsed: &ParsedJSX, file_path: &str, options: &AnalysisOptions) -> FileAnalysis {
    let locator = Locator::new(file_path, &parsed.source_map);
    let declarations =
        collect_translate_declarations(&parsed.module.body, &options.translate_functions);

    let mut analysis = FileAnalysis {
        declarations: declarations.len(),
        findings: Vec::new(),
    };
    for decl in declarations {
        analysis
            .findings
            .extend(analyze_declaration(parsed, decl, locator, options));
    }

    debug!(
        file = file_path,
        declarations = analysis.declarations,
        findings = analysis.findings.len(),
        "analyzed file"
    );
    analysis
}

fn analyze_declaration(
    parsed: &ParsedJSX,
    decl: TranslateDeclaration<'_>,
    locator: Locator<'_>,
    options: &AnalysisOptions,
) -> Vec<Finding> {
    let KeyTreeBuild {
        mut tree,
        mut findings,
    } = match build_from_call(decl.binding, decl.span, decl.call, locator) {
        Ok(build) => build,
        Err(error) => {
            debug!(binding = decl.binding, %error, "skipping declaration");
            return vec![Finding::BuildError(BuildErrorFinding {
                context: locator.locate(decl.span),
                binding: decl.binding.to_string(),
                error,
            })];
        }
    };

    let paths = resolve(&parsed.module, decl.binding, locator);
    findings.extend(mark(&mut tree, &paths));
    findings.extend(check_reachability(&tree, options.opaque_severity));
    findings
}

/// Parse and analyze one source text.
pub fn analyze_source(code: String, file_path: &str, options: &AnalysisOptions) -> Result<FileAnalysis> {
    let parsed = parse_jsx_source(code, file_path, Arc::new(SourceMap::default()))?;
    Ok(analyze_module(&parsed, file_path, options))
}
