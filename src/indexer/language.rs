//! Programming language detection from file extensions
//!
//! Each supported language carries its own boundary marker set so that a
//! marker from one syntax never splits a file written in another.

use serde::{Deserialize, Serialize};

/// Source languages with dedicated boundary markers and grammar support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceLanguage {
    Python,
    JavaScript,
    TypeScript,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Rust,
    Ruby,
    Php,
    Swift,
}

impl SourceLanguage {
    /// All languages, in a stable order
    pub const ALL: [SourceLanguage; 12] = [
        SourceLanguage::Python,
        SourceLanguage::JavaScript,
        SourceLanguage::TypeScript,
        SourceLanguage::Java,
        SourceLanguage::C,
        SourceLanguage::Cpp,
        SourceLanguage::CSharp,
        SourceLanguage::Go,
        SourceLanguage::Rust,
        SourceLanguage::Ruby,
        SourceLanguage::Php,
        SourceLanguage::Swift,
    ];

    /// Resolve a language from a file extension, with or without the leading dot
    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.trim_start_matches('.').to_lowercase();
        let lang = match ext.as_str() {
            "py" | "pyw" => SourceLanguage::Python,
            "js" | "mjs" | "cjs" | "jsx" => SourceLanguage::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => SourceLanguage::TypeScript,
            "java" => SourceLanguage::Java,
            "c" => SourceLanguage::C,
            "cpp" | "cc" | "cxx" | "h" | "hpp" | "hh" | "hxx" => SourceLanguage::Cpp,
            "cs" => SourceLanguage::CSharp,
            "go" => SourceLanguage::Go,
            "rs" => SourceLanguage::Rust,
            "rb" => SourceLanguage::Ruby,
            "php" => SourceLanguage::Php,
            "swift" => SourceLanguage::Swift,
            _ => return None,
        };
        Some(lang)
    }

    /// Human readable language name
    pub fn name(&self) -> &'static str {
        match self {
            SourceLanguage::Python => "Python",
            SourceLanguage::JavaScript => "JavaScript",
            SourceLanguage::TypeScript => "TypeScript",
            SourceLanguage::Java => "Java",
            SourceLanguage::C => "C",
            SourceLanguage::Cpp => "C++",
            SourceLanguage::CSharp => "C#",
            SourceLanguage::Go => "Go",
            SourceLanguage::Rust => "Rust",
            SourceLanguage::Ruby => "Ruby",
            SourceLanguage::Php => "PHP",
            SourceLanguage::Swift => "Swift",
        }
    }

    /// Literal line prefixes that open a new logical unit in this language.
    ///
    /// Prefixes are matched case-sensitively against the whitespace-stripped line.
    pub fn boundary_markers(&self) -> &'static [&'static str] {
        match self {
            SourceLanguage::Python => &[
                "def ",
                "async def ",
                "class ",
                "if __name__",
                "# %%",
                "\"\"\"",
                "'''",
            ],
            SourceLanguage::JavaScript => &[
                "function ",
                "function* ",
                "async function ",
                "export function ",
                "export async function ",
                "export default function ",
                "class ",
                "export class ",
                "export default class ",
                "if (require.main === module)",
                "// %%",
                "/**",
            ],
            SourceLanguage::TypeScript => &[
                "function ",
                "async function ",
                "export function ",
                "export async function ",
                "export default function ",
                "class ",
                "abstract class ",
                "export class ",
                "export abstract class ",
                "export default class ",
                "interface ",
                "export interface ",
                "enum ",
                "export enum ",
                "namespace ",
                "if (require.main === module)",
                "// %%",
                "/**",
            ],
            SourceLanguage::Java => &[
                "public class",
                "class ",
                "abstract class ",
                "public abstract class",
                "final class ",
                "public final class",
                "interface ",
                "public interface",
                "enum ",
                "public enum",
                "record ",
                "public record",
                "public static void main",
                "void ",
                "public void ",
                "private void ",
                "protected void ",
                "public static ",
                "private static ",
                "// %%",
                "/**",
            ],
            SourceLanguage::C => &[
                "void ",
                "static ",
                "struct ",
                "typedef ",
                "enum ",
                "union ",
                "int main(",
                "// %%",
                "/**",
            ],
            SourceLanguage::Cpp => &[
                "void ",
                "static ",
                "struct ",
                "typedef ",
                "enum ",
                "union ",
                "class ",
                "namespace ",
                "template",
                "int main(",
                "// %%",
                "/**",
            ],
            SourceLanguage::CSharp => &[
                "class ",
                "public class",
                "internal class",
                "public static class",
                "interface ",
                "public interface",
                "struct ",
                "public struct",
                "enum ",
                "public enum",
                "namespace ",
                "static void Main",
                "public static void Main",
                "void ",
                "public void ",
                "private void ",
                "// %%",
                "///",
            ],
            SourceLanguage::Go => &[
                "func ",
                "type ",
                "package ",
                "import (",
                "// %%",
                "/*",
            ],
            SourceLanguage::Rust => &[
                "fn ",
                "pub fn ",
                "pub(crate) fn ",
                "async fn ",
                "pub async fn ",
                "struct ",
                "pub struct ",
                "enum ",
                "pub enum ",
                "trait ",
                "pub trait ",
                "impl ",
                "impl<",
                "mod ",
                "pub mod ",
                "#[cfg(test)]",
                "// %%",
                "//!",
                "///",
            ],
            SourceLanguage::Ruby => &[
                "def ",
                "class ",
                "module ",
                "if __FILE__ == $0",
                "if $PROGRAM_NAME == __FILE__",
                "# %%",
                "=begin",
            ],
            SourceLanguage::Php => &[
                "function ",
                "public function",
                "private function",
                "protected function",
                "public static function",
                "class ",
                "abstract class ",
                "final class ",
                "interface ",
                "trait ",
                "namespace ",
                "// %%",
                "/**",
            ],
            SourceLanguage::Swift => &[
                "func ",
                "public func ",
                "private func ",
                "class ",
                "struct ",
                "enum ",
                "protocol ",
                "extension ",
                "init(",
                "@main",
                "// MARK:",
                "// %%",
                "///",
            ],
        }
    }
}

impl std::fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Detect programming language from file extension
pub fn detect_language(extension: &str) -> Option<String> {
    SourceLanguage::from_extension(extension).map(|lang| lang.name().to_string())
}
