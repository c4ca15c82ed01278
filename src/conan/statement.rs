//! Minimal parser for the `set(...)` statements found in Conan-generated
//! CMake data files.
//!
//! Conan's CMakeDeps generator emits flat, declarative files consisting of
//! `set(<variable> <arguments...>)` statements. This parser extracts those
//! statements without interpreting any other CMake syntax. Arguments may be
//! quoted (quotes can contain whitespace, semicolons and parentheses, e.g.
//! `C:/Program Files (x86)/...`) or bare tokens separated by whitespace.

/// One parsed `set()` statement: the variable name and its raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStatement {
    pub variable: String,
    pub arguments: Vec<String>,
}

/// The data-file fields the synthesizer cares about.
///
/// Conan variable names follow the `<PKG>_<FIELD>_<BUILD-TYPE>` convention,
/// e.g. `zlib_INCLUDE_DIRS_RELEASE`. Any other field kind is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    IncludeDirs,
    CompileDefinitions,
    FrameworkDirs,
    Frameworks,
    PackageFolder,
}

/// Classify a Conan data-file variable name, returning `None` for fields
/// this crate does not consume (LIB_DIRS, LIBS, and so on).
pub fn classify(variable: &str) -> Option<FieldKind> {
    if variable.contains("_INCLUDE_DIRS_") {
        Some(FieldKind::IncludeDirs)
    } else if variable.contains("_COMPILE_DEFINITIONS_") {
        Some(FieldKind::CompileDefinitions)
    } else if variable.contains("_FRAMEWORK_DIRS_") {
        Some(FieldKind::FrameworkDirs)
    } else if variable.contains("_FRAMEWORKS_") {
        Some(FieldKind::Frameworks)
    } else if variable.contains("_PACKAGE_FOLDER_") {
        Some(FieldKind::PackageFolder)
    } else {
        None
    }
}

/// Extract all `set()` statements from a data file's content.
///
/// Statements that never close their parenthesis are dropped; malformed
/// input yields fewer statements, never an error.
pub fn parse_statements(content: &str) -> Vec<SetStatement> {
    let mut statements = Vec::new();
    let mut rest = content;

    while let Some(pos) = rest.find("set(") {
        // Reject matches like "offset(" by requiring a statement boundary.
        let at_boundary = pos == 0
            || rest[..pos]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_whitespace());

        let body_start = pos + "set(".len();
        if !at_boundary {
            rest = &rest[body_start..];
            continue;
        }

        match extract_body(&rest[body_start..]) {
            Some((body, consumed)) => {
                if let Some(statement) = parse_body(body) {
                    statements.push(statement);
                }
                rest = &rest[body_start + consumed..];
            }
            // Unterminated statement; nothing more to parse.
            None => break,
        }
    }

    statements
}

/// Return the statement body up to the closing parenthesis, quote-aware,
/// along with the number of bytes consumed (body + closing paren).
fn extract_body(input: &str) -> Option<(&str, usize)> {
    let mut in_quote = false;
    for (idx, ch) in input.char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            ')' if !in_quote => return Some((&input[..idx], idx + 1)),
            _ => {}
        }
    }
    None
}

/// Split a statement body into the variable name and its arguments.
fn parse_body(body: &str) -> Option<SetStatement> {
    let body = body.trim();
    let name_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let variable = &body[..name_end];
    if variable.is_empty() {
        return None;
    }

    Some(SetStatement {
        variable: variable.to_string(),
        arguments: tokenize(&body[name_end..]),
    })
}

/// Tokenize statement arguments: quoted strings keep embedded whitespace,
/// bare tokens split on whitespace.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                if in_quote {
                    // Closing quote always terminates a token, even an empty one.
                    tokens.push(std::mem::take(&mut current));
                }
                in_quote = !in_quote;
            }
            c if c.is_whitespace() && !in_quote => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_argument() {
        let statements =
            parse_statements("set(zlib_INCLUDE_DIRS_RELEASE \"/pkg/zlib/include\")\n");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].variable, "zlib_INCLUDE_DIRS_RELEASE");
        assert_eq!(statements[0].arguments, vec!["/pkg/zlib/include"]);
    }

    #[test]
    fn quoted_argument_may_contain_parentheses() {
        let content = "set(zlib_PACKAGE_FOLDER_RELEASE \"C:/Program Files (x86)/conan/zlib\")";
        let statements = parse_statements(content);
        assert_eq!(
            statements[0].arguments,
            vec!["C:/Program Files (x86)/conan/zlib"]
        );
    }

    #[test]
    fn parses_multiple_statements_and_bare_tokens() {
        let content = "\
set(fmt_COMPILE_DEFINITIONS_DEBUG FMT_SHARED FMT_HEADER_ONLY)
set(fmt_INCLUDE_DIRS_DEBUG \"/pkg/fmt/include\")
";
        let statements = parse_statements(content);
        assert_eq!(statements.len(), 2);
        assert_eq!(
            statements[0].arguments,
            vec!["FMT_SHARED", "FMT_HEADER_ONLY"]
        );
    }

    #[test]
    fn handles_multiline_statement() {
        let content = "set(boost_FRAMEWORKS_RELEASE\n    \"CoreFoundation\"\n    \"Security\")";
        let statements = parse_statements(content);
        assert_eq!(
            statements[0].arguments,
            vec!["CoreFoundation", "Security"]
        );
    }

    #[test]
    fn ignores_non_statement_text_and_partial_matches() {
        let content = "# comment mentioning offset(1)\nif(NOT DEFINED x)\nset(a_INCLUDE_DIRS_DEBUG \"/x\")";
        let statements = parse_statements(content);
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].variable, "a_INCLUDE_DIRS_DEBUG");
    }

    #[test]
    fn unterminated_statement_is_dropped() {
        assert!(parse_statements("set(zlib_INCLUDE_DIRS_DEBUG \"/x\"").is_empty());
    }

    #[test]
    fn empty_argument_list_yields_no_arguments() {
        let statements = parse_statements("set(zlib_COMPILE_DEFINITIONS_RELEASE )");
        assert_eq!(statements.len(), 1);
        assert!(statements[0].arguments.is_empty());
    }

    #[test]
    fn classifies_known_field_kinds() {
        assert_eq!(
            classify("zlib_INCLUDE_DIRS_RELEASE"),
            Some(FieldKind::IncludeDirs)
        );
        assert_eq!(
            classify("fmt_COMPILE_DEFINITIONS_DEBUG"),
            Some(FieldKind::CompileDefinitions)
        );
        assert_eq!(
            classify("boost_FRAMEWORK_DIRS_RELEASE"),
            Some(FieldKind::FrameworkDirs)
        );
        assert_eq!(
            classify("boost_FRAMEWORKS_RELEASE"),
            Some(FieldKind::Frameworks)
        );
        assert_eq!(
            classify("zlib_PACKAGE_FOLDER_RELEASE"),
            Some(FieldKind::PackageFolder)
        );
        assert_eq!(classify("zlib_LIB_DIRS_RELEASE"), None);
    }
}
