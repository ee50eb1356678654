//! Per-file complexity metrics computed from tree-sitter syntax trees

use super::encoding::decode_source;
use crate::error::AnalysisError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tree_sitter::{Language, Node, Parser};

/// Supported extensions grouped by language family
pub const SUPPORTED_EXTENSIONS: &[(&str, &[&str])] = &[
    ("Python", &["py"]),
    ("JavaScript/TypeScript", &["js", "jsx", "ts", "tsx"]),
    ("Java", &["java"]),
    ("C/C++", &["c", "cpp", "h", "hpp"]),
    ("Ruby", &["rb"]),
    ("Go", &["go"]),
    ("Rust", &["rs"]),
    ("PHP", &["php"]),
    ("C#", &["cs"]),
    ("Swift", &["swift"]),
];

/// Node kinds treated as a function body for metrics
const FUNCTION_KINDS: &[&str] = &[
    "function_item",
    "function_definition",
    "function_declaration",
    "function_expression",
    "generator_function_declaration",
    "arrow_function",
    "method_definition",
    "method_declaration",
    "constructor_declaration",
    "local_function_statement",
    "method",
    "singleton_method",
    "init_declaration",
];

/// Named nodes that add a branch to cyclomatic complexity
const DECISION_KINDS: &[&str] = &[
    "if_statement",
    "if_expression",
    "elif_clause",
    "else_if_clause",
    "for_statement",
    "for_in_statement",
    "for_expression",
    "enhanced_for_statement",
    "foreach_statement",
    "while_statement",
    "while_expression",
    "do_statement",
    "repeat_while_statement",
    "catch_clause",
    "except_clause",
    "case_statement",
    "switch_label",
    "switch_section",
    "switch_entry",
    "expression_case",
    "type_case",
    "communication_case",
    "match_arm",
    "conditional_expression",
    "ternary_expression",
    "guard_statement",
    // Ruby
    "if",
    "elsif",
    "unless",
    "while",
    "until",
    "for",
    "when",
    "rescue",
    "conditional",
    "if_modifier",
    "unless_modifier",
    "while_modifier",
    "until_modifier",
];

/// Anonymous operator tokens that add a branch
const DECISION_TOKENS: &[&str] = &["&&", "||", "and", "or"];

const PARAMETER_LIST_KINDS: &[&str] = &[
    "parameters",
    "formal_parameters",
    "parameter_list",
    "method_parameters",
    "function_value_parameters",
];

/// Metrics for a single function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FunctionMetrics {
    pub name: String,
    /// Cyclomatic complexity (1 + decision points)
    pub complexity: usize,
    /// Lines containing code, excluding blanks and comments
    pub nloc: usize,
    pub parameters: usize,
    /// 1-based line where the function starts
    pub start_line: usize,
    pub end_line: usize,
}

/// Metrics for a whole file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CodeMetrics {
    /// Average cyclomatic complexity across functions
    pub cyclomatic_complexity: f64,
    pub nloc: usize,
    pub function_count: usize,
    pub avg_lines_per_function: f64,
    pub functions: Vec<FunctionMetrics>,
}

/// Computes complexity metrics for source files
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeAnalyzer;

impl CodeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Whether the extension (with or without leading dot) can be analyzed
    pub fn is_supported(extension: &str) -> bool {
        grammar_for(extension).is_some()
    }

    /// Read and analyze a file
    pub fn analyze_file(&self, path: &Path) -> Result<CodeMetrics, AnalysisError> {
        let label = path.display().to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| AnalysisError::UnsupportedLanguage(label.clone()))?;

        let bytes = std::fs::read(path).map_err(|e| AnalysisError::failed(&label, e))?;
        let (source, encoding) = decode_source(&bytes);
        if encoding != encoding_rs::UTF_8 {
            tracing::debug!("Decoded {} as {}", label, encoding.name());
        }

        self.analyze_source(&source, extension, &label)
    }

    /// Analyze source text whose language is given by `extension`
    pub fn analyze_source(
        &self,
        source: &str,
        extension: &str,
        label: &str,
    ) -> Result<CodeMetrics, AnalysisError> {
        let language = grammar_for(extension)
            .ok_or_else(|| AnalysisError::UnsupportedLanguage(extension.to_string()))?;

        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| AnalysisError::failed(label, e))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::failed(label, "parser produced no syntax tree"))?;

        let root = tree.root_node();
        let bytes = source.as_bytes();

        let mut code_rows = BTreeSet::new();
        collect_code_rows(root, &mut code_rows);

        let mut function_nodes = Vec::new();
        collect_functions(root, &mut function_nodes);

        let functions: Vec<FunctionMetrics> = function_nodes
            .into_iter()
            .map(|node| {
                let start = node.start_position().row;
                let end = node.end_position().row;
                FunctionMetrics {
                    name: function_name(node, bytes),
                    complexity: 1 + count_decisions(node),
                    nloc: code_rows.range(start..=end).count(),
                    parameters: count_parameters(node),
                    start_line: start + 1,
                    end_line: end + 1,
                }
            })
            .collect();

        let function_count = functions.len();
        let (cyclomatic_complexity, avg_lines_per_function) = if function_count == 0 {
            (0.0, 0.0)
        } else {
            let total_complexity: usize = functions.iter().map(|f| f.complexity).sum();
            let total_nloc: usize = functions.iter().map(|f| f.nloc).sum();
            (
                total_complexity as f64 / function_count as f64,
                total_nloc as f64 / function_count as f64,
            )
        };

        tracing::debug!(
            "Analyzed {}: {} functions, {} nloc",
            label,
            function_count,
            code_rows.len()
        );

        Ok(CodeMetrics {
            cyclomatic_complexity,
            nloc: code_rows.len(),
            function_count,
            avg_lines_per_function,
            functions,
        })
    }
}

fn grammar_for(extension: &str) -> Option<Language> {
    let language = match extension.trim_start_matches('.').to_lowercase().as_str() {
        "rs" => tree_sitter_rust::LANGUAGE.into(),
        "py" => tree_sitter_python::LANGUAGE.into(),
        "js" | "mjs" | "cjs" | "jsx" => tree_sitter_javascript::LANGUAGE.into(),
        "ts" => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        "tsx" => tree_sitter_typescript::LANGUAGE_TSX.into(),
        "go" => tree_sitter_go::LANGUAGE.into(),
        "java" => tree_sitter_java::LANGUAGE.into(),
        "swift" => tree_sitter_swift::LANGUAGE.into(),
        "c" => tree_sitter_c::LANGUAGE.into(),
        "cpp" | "cc" | "cxx" | "h" | "hpp" | "hh" | "hxx" => tree_sitter_cpp::LANGUAGE.into(),
        "cs" => tree_sitter_c_sharp::LANGUAGE.into(),
        "rb" => tree_sitter_ruby::LANGUAGE.into(),
        "php" => tree_sitter_php::LANGUAGE_PHP.into(),
        _ => return None,
    };
    Some(language)
}

/// Rows holding at least one non-comment token
fn collect_code_rows(node: Node, rows: &mut BTreeSet<usize>) {
    if node.child_count() == 0 {
        if !node.kind().contains("comment") && node.start_byte() < node.end_byte() {
            rows.extend(node.start_position().row..=node.end_position().row);
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_code_rows(child, rows);
    }
}

fn collect_functions<'tree>(node: Node<'tree>, result: &mut Vec<Node<'tree>>) {
    if node.is_named() && FUNCTION_KINDS.contains(&node.kind()) {
        result.push(node);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_functions(child, result);
    }
}

/// Decision points inside a function, not descending into nested functions
fn count_decisions(function: Node) -> usize {
    fn visit(node: Node, count: &mut usize) {
        let kind = node.kind();
        if node.is_named() {
            if DECISION_KINDS.contains(&kind) {
                *count += 1;
            }
        } else if DECISION_TOKENS.contains(&kind) {
            *count += 1;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.is_named() && FUNCTION_KINDS.contains(&child.kind()) {
                continue;
            }
            visit(child, count);
        }
    }

    let mut count = 0;
    let mut cursor = function.walk();
    for child in function.children(&mut cursor) {
        if child.is_named() && FUNCTION_KINDS.contains(&child.kind()) {
            continue;
        }
        visit(child, &mut count);
    }
    count
}

fn function_name(node: Node, source: &[u8]) -> String {
    if let Some(name) = node.child_by_field_name("name")
        && let Ok(text) = name.utf8_text(source)
    {
        return text.to_string();
    }

    // C and C++ nest the name inside declarators
    let mut declarator = node.child_by_field_name("declarator");
    while let Some(current) = declarator {
        match current.kind() {
            "identifier" | "field_identifier" | "qualified_identifier" | "destructor_name"
            | "operator_name" => {
                if let Ok(text) = current.utf8_text(source) {
                    return text.to_string();
                }
                break;
            }
            _ => declarator = current.child_by_field_name("declarator"),
        }
    }

    // Anonymous functions assigned to a variable or object key
    if let Some(parent) = node.parent() {
        let target = match parent.kind() {
            "variable_declarator" | "assignment_expression" => parent
                .child_by_field_name("name")
                .or_else(|| parent.child_by_field_name("left")),
            "pair" => parent.child_by_field_name("key"),
            _ => None,
        };
        if let Some(target) = target
            && let Ok(text) = target.utf8_text(source)
        {
            return text.to_string();
        }
    }

    "(anonymous)".to_string()
}

fn count_parameters(node: Node) -> usize {
    fn count_named(list: Node) -> usize {
        let mut cursor = list.walk();
        list.named_children(&mut cursor)
            .filter(|c| !c.kind().contains("comment"))
            .count()
    }

    if let Some(params) = node.child_by_field_name("parameters") {
        return count_named(params);
    }

    // Single unparenthesized arrow function parameter
    if node.child_by_field_name("parameter").is_some() {
        return 1;
    }

    if let Some(list) = find_parameter_list(node) {
        return count_named(list);
    }

    // Swift lists parameters directly under the declaration
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == "parameter")
        .count()
}

/// First parameter list outside the function body
fn find_parameter_list(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    for child in children {
        if Some(child) == node.child_by_field_name("body") {
            continue;
        }
        if PARAMETER_LIST_KINDS.contains(&child.kind()) {
            return Some(child);
        }
        if let Some(found) = find_parameter_list(child) {
            return Some(found);
        }
    }
    None
}
