//! CodeQL query text for compiled rule sets.
//!
//! `regexpMatch` must match the whole string, so every convention source is
//! wrapped in `.*` on both sides. Java regex reads the sources as written:
//! classes, anchors and `(?i)` mean the same thing there.

use cryptoql_core::constants::{DEFAULT_QUERY_ID_PREFIX, DEFAULT_QUERY_LANGUAGE, VERSION};
use cryptoql_core::Surface;

use crate::compiler::{CompiledRule, RuleKind, RuleSet};
use crate::variants::expand_family;

const CASE_INSENSITIVE_FLAG: &str = "(?i)";

/// File name of the regexp query for a surface.
pub fn regexp_file_name(surface: Surface) -> &'static str {
    match surface {
        Surface::FunctionName => "query_regexp_calls.ql",
        Surface::MacroName => "query_regexp_macro.ql",
        Surface::Argument => "query_regexp_args.ql",
    }
}

/// File name of the exact-name query.
pub const EXACT_NAME_FILE_NAME: &str = "query_noargs.ql";

/// Renders rule sets as CodeQL source.
#[derive(Debug, Clone)]
pub struct QueryRenderer {
    id_prefix: String,
    language: String,
}

impl QueryRenderer {
    pub fn new(id_prefix: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            language: language.into(),
        }
    }

    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    /// The regexp query for one rule set.
    pub fn render(&self, set: &RuleSet) -> String {
        let surface = set.surface();
        let mut out = String::new();

        out.push_str(&self.header(
            &format!("Cryptographic algorithm in {}", surface_noun(surface)),
            &format!(
                "Finds {} naming a cryptographic algorithm and reports its category and recommended alternative.",
                surface_plural(surface)
            ),
            &format!("regexp-{}", surface_slug(surface)),
        ));
        out.push_str(&format!("// Taxonomy fingerprint: {:016x}\n\n", set.fingerprint()));
        out.push_str(&format!("import {}\n\n", self.language));

        let concat = set
            .rules()
            .iter()
            .find(|r| r.kind() == RuleKind::Concatenated);
        out.push_str("predicate isConcatenated(string name) {\n");
        match concat.and_then(|r| r.patterns().first()) {
            Some(source) => out.push_str(&format!("  name.regexpMatch({})\n", full_match(source))),
            None => out.push_str("  none()\n"),
        }
        out.push_str("}\n\n");

        let labelled: Vec<RulePredicates<'_>> = set
            .rules()
            .iter()
            .filter(|r| r.kind() != RuleKind::Concatenated)
            .enumerate()
            .map(|(idx, rule)| RulePredicates::new(idx, rule))
            .collect();

        for preds in &labelled {
            out.push_str(&format!("predicate {}(string name) {{\n", preds.matches));
            out.push_str("  not isConcatenated(name) and\n  (\n");
            let clauses: Vec<String> = preds
                .rule
                .patterns()
                .iter()
                .map(|p| format!("    name.regexpMatch({})", full_match(p)))
                .collect();
            out.push_str(&clauses.join(" or\n"));
            out.push_str("\n  )\n}\n\n");
            out.push_str(&strength_function(preds));
        }

        for idx in 0..labelled.len() {
            out.push_str(&winner_predicate(idx, &labelled));
        }

        out.push_str(
            "predicate getCategory(string name, string category, string subcategory, string alternative) {\n",
        );
        let mut arms: Vec<String> = Vec::new();
        if let Some(rule) = concat {
            arms.push(format!("  isConcatenated(name) and {}", labels(rule)));
        }
        for preds in &labelled {
            arms.push(format!("  {}(name) and {}", preds.wins, labels(preds.rule)));
        }
        if arms.is_empty() {
            out.push_str("  none()\n");
        } else {
            out.push_str(&arms.join("\n  or\n"));
            out.push('\n');
        }
        out.push_str("}\n\n");

        out.push_str(select_clause(surface));
        out
    }

    /// The exact-name query: every concrete spelling of every token,
    /// compared case-insensitively against called function names.
    pub fn render_exact_names(&self, set: &RuleSet) -> String {
        let mut out = self.header(
            "Cryptographic algorithm named exactly by a function",
            "Finds calls to functions whose whole name is a cryptographic algorithm token.",
            "exact-names",
        );
        out.push_str(&format!("// Taxonomy fingerprint: {:016x}\n\n", set.fingerprint()));
        out.push_str(&format!("import {}\n\n", self.language));
        out.push_str(
            "predicate getCategory(string name, string category, string subcategory, string alternative) {\n",
        );

        let mut arms: Vec<String> = Vec::new();
        for rule in set.rules().iter().filter(|r| r.kind() != RuleKind::Concatenated) {
            for spelling in expand_family(rule.tokens()).spellings() {
                arms.push(format!(
                    "  name.toLowerCase() = {} and {}",
                    ql_string(&spelling),
                    labels(rule)
                ));
            }
        }
        if arms.is_empty() {
            out.push_str("  none()\n");
        } else {
            out.push_str(&arms.join("\n  or\n"));
            out.push('\n');
        }
        out.push_str("}\n\n");
        out.push_str(select_clause(Surface::FunctionName));
        out
    }

    fn header(&self, name: &str, description: &str, id_suffix: &str) -> String {
        let mut out = String::from("/**\n");
        out.push_str(&format!(" * @name {name}\n"));
        out.push_str(&format!(" * @description {description}\n"));
        out.push_str(" * @kind problem\n");
        out.push_str(" * @problem.severity warning\n");
        out.push_str(&format!(" * @id {}/{id_suffix}\n", self.id_prefix));
        out.push_str(" */\n\n");
        out.push_str(&format!("// Generated by cryptoql {VERSION}\n"));
        out
    }
}

impl Default for QueryRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_ID_PREFIX, DEFAULT_QUERY_LANGUAGE)
    }
}

fn surface_noun(surface: Surface) -> &'static str {
    match surface {
        Surface::FunctionName => "function name",
        Surface::MacroName => "macro name",
        Surface::Argument => "call argument",
    }
}

fn surface_plural(surface: Surface) -> &'static str {
    match surface {
        Surface::FunctionName => "calls whose function name",
        Surface::MacroName => "macro invocations whose macro name",
        Surface::Argument => "string arguments whose value",
    }
}

fn surface_slug(surface: Surface) -> &'static str {
    match surface {
        Surface::FunctionName => "calls",
        Surface::MacroName => "macro",
        Surface::Argument => "args",
    }
}

fn select_clause(surface: Surface) -> &'static str {
    match surface {
        Surface::FunctionName => concat!(
            "from FunctionCall call, string name, string category, string subcategory, string alternative\n",
            "where\n",
            "  name = call.getTarget().getName() and\n",
            "  getCategory(name, category, subcategory, alternative)\n",
            "select call,\n",
            "  \"Function name: \" + name + \", Category: \" + category + \", Subcategory: \" + subcategory +\n",
            "    \", Alternative: \" + alternative\n",
        ),
        Surface::MacroName => concat!(
            "from MacroInvocation mi, string name, string category, string subcategory, string alternative\n",
            "where\n",
            "  name = mi.getMacroName() and\n",
            "  getCategory(name, category, subcategory, alternative)\n",
            "select mi,\n",
            "  \"Macro name: \" + name + \", Category: \" + category + \", Subcategory: \" + subcategory +\n",
            "    \", Alternative: \" + alternative\n",
        ),
        Surface::Argument => concat!(
            "from FunctionCall call, StringLiteral arg, string name, string category, string subcategory,\n",
            "  string alternative\n",
            "where\n",
            "  arg = call.getAnArgument() and\n",
            "  name = arg.getValue() and\n",
            "  getCategory(name, category, subcategory, alternative)\n",
            "select arg,\n",
            "  \"Function name: \" + call.getTarget().getName() + \", Argument: \" + name + \", Category: \" +\n",
            "    category + \", Subcategory: \" + subcategory + \", Alternative: \" + alternative\n",
        ),
    }
}

fn labels(rule: &CompiledRule) -> String {
    format!(
        "category = {} and subcategory = {} and alternative = {}",
        ql_string(rule.category()),
        ql_string(rule.subcategory()),
        ql_string(rule.alternative())
    )
}

/// The QL names rendered for one subcategory or mode rule.
struct RulePredicates<'r> {
    rule: &'r CompiledRule,
    matches: String,
    strength: String,
    wins: String,
}

impl<'r> RulePredicates<'r> {
    fn new(idx: usize, rule: &'r CompiledRule) -> Self {
        Self {
            rule,
            matches: predicate_name("matches", idx, rule),
            strength: predicate_name("strength", idx, rule),
            wins: predicate_name("wins", idx, rule),
        }
    }
}

/// `<prefix><idx>_<Category>_<Subcategory>` with anything outside
/// `[A-Za-z0-9_]` replaced by `_`.
fn predicate_name(prefix: &str, idx: usize, rule: &CompiledRule) -> String {
    let sanitize = |s: &str| -> String {
        s.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    };
    format!(
        "{prefix}{idx}_{}_{}",
        sanitize(rule.category()),
        sanitize(rule.subcategory())
    )
}

/// Strength of the longest token a rule anchors on: twice its length, plus
/// one when it is an exact spelling. Mirrors `Anchor::strength`.
fn strength_function(preds: &RulePredicates<'_>) -> String {
    let finds: Vec<String> = preds
        .rule
        .patterns()
        .iter()
        .map(|p| {
            let source = ql_string(p);
            format!("    token = name.regexpFind({source}, _, _).regexpCapture({source}, 1)")
        })
        .collect();
    let spellings: Vec<String> = expand_family(preds.rule.tokens())
        .spellings()
        .iter()
        .map(|s| ql_string(s))
        .collect();
    let exact = if spellings.is_empty() {
        "0".to_string()
    } else {
        format!(
            "(if token.toLowerCase() = [{}] then 1 else 0)",
            spellings.join(", ")
        )
    };

    let mut out = format!("int {}(string name) {{\n", preds.strength);
    out.push_str("  result = max(string token |\n");
    out.push_str(&finds.join(" or\n"));
    out.push_str(&format!("\n  |\n    token.length() * 2 + {exact}\n  )\n}}\n\n"));
    out
}

/// Rule `idx` wins when it fires and no other firing rule outranks it: a
/// stronger anchor wins, and an equal one goes to the rule declared first.
fn winner_predicate(idx: usize, all: &[RulePredicates<'_>]) -> String {
    let own = &all[idx];
    let mut clauses = vec![format!("  {}(name)", own.matches)];
    for (other_idx, other) in all.iter().enumerate() {
        if other_idx == idx {
            continue;
        }
        let cmp = if other_idx < idx { ">=" } else { ">" };
        clauses.push(format!(
            "  not ({}(name) and {}(name) {cmp} {}(name))",
            other.matches, other.strength, own.strength
        ));
    }
    format!(
        "predicate {}(string name) {{\n{}\n}}\n\n",
        own.wins,
        clauses.join(" and\n")
    )
}

/// Quote a regex source as a whole-string QL regexp literal. The source is
/// grouped so a top-level alternation stays inside the `.*` padding.
fn full_match(source: &str) -> String {
    match source.strip_prefix(CASE_INSENSITIVE_FLAG) {
        Some(rest) => ql_string(&format!("{CASE_INSENSITIVE_FLAG}.*(?:{rest}).*")),
        None => ql_string(&format!(".*(?:{source}).*")),
    }
}

/// A QL string literal.
fn ql_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ql_string_escapes() {
        assert_eq!(ql_string(r#"a\.b"c"#), r#""a\\.b\"c""#);
    }

    #[test]
    fn full_match_keeps_flag_first() {
        assert_eq!(full_match("(?i)x"), r#""(?i).*(?:x).*""#);
        assert_eq!(full_match("x"), r#"".*(?:x).*""#);
        assert_eq!(full_match("(?i)a|b"), r#""(?i).*(?:a|b).*""#);
    }

    #[test]
    fn header_names_generator_version() {
        let header = QueryRenderer::default().header("n", "d", "x");
        assert!(header.ends_with(&format!(" */\n\n// Generated by cryptoql {VERSION}\n")));
    }

    #[test]
    fn file_names_per_surface() {
        assert_eq!(regexp_file_name(Surface::FunctionName), "query_regexp_calls.ql");
        assert_eq!(regexp_file_name(Surface::MacroName), "query_regexp_macro.ql");
        assert_eq!(regexp_file_name(Surface::Argument), "query_regexp_args.ql");
    }
}
