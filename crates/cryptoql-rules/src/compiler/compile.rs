//! The rule compiler: taxonomy in, one rule set per surface out.

use std::sync::Arc;

use cryptoql_core::constants::{
    CONCATENATED_LABEL, MODE_CATEGORY, SAFE_ALTERNATIVE, UNSPECIFIED_ALTERNATIVE,
};
use cryptoql_core::errors::CompileError;
use cryptoql_core::Surface;

use super::rule::{CompiledRule, RuleKind};
use super::rule_set::RuleSet;
use crate::boundary::{BoundaryMatcher, Matcher};
use crate::concat::{ConcatenationDetector, GuardedMatcher};
use crate::taxonomy::Taxonomy;
use crate::variants::{expand, expand_family};

/// Knobs for one compiler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Emit one `SAFE` rule per operation-mode token.
    pub include_modes: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            include_modes: true,
        }
    }
}

/// Compile one surface with default options.
pub fn compile(taxonomy: &Taxonomy, surface: Surface) -> Result<RuleSet, CompileError> {
    compile_with(taxonomy, surface, CompileOptions::default())
}

/// Compile one surface.
///
/// Rules come out in declaration order: one per subcategory, then one per
/// mode token (longest first), then the concatenation rule. An empty
/// taxonomy yields an empty rule set. Any pattern failure aborts the whole
/// run.
pub fn compile_with(
    taxonomy: &Taxonomy,
    surface: Surface,
    options: CompileOptions,
) -> Result<RuleSet, CompileError> {
    let detector = Arc::new(
        ConcatenationDetector::from_tokens(taxonomy.algorithm_tokens())
            .map_err(|e| CompileError::VocabularyFailed(e.to_string()))?,
    );

    let mut rules = Vec::with_capacity(taxonomy.subcategory_count() + taxonomy.modes().len() + 1);

    for (category, subcategory) in taxonomy.subcategories() {
        let path = format!("{}/{}", category.name, subcategory.name);
        let boundary = BoundaryMatcher::build(&expand_family(&subcategory.tokens))
            .map_err(|e| CompileError::PatternFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        let patterns = owned_sources(&boundary);
        tracing::debug!(
            surface = %surface,
            path = %path,
            tokens = subcategory.tokens.len(),
            "Compiled subcategory rule"
        );
        rules.push(CompiledRule::new(
            surface,
            RuleKind::Algorithm,
            &category.name,
            &subcategory.name,
            &subcategory.alternative,
            subcategory.tokens.clone(),
            patterns,
            Arc::new(GuardedMatcher::new(detector.clone(), boundary)),
        ));
    }

    if options.include_modes {
        for mode in taxonomy.modes() {
            let boundary =
                BoundaryMatcher::build(&expand(mode)).map_err(|e| CompileError::PatternFailed {
                    path: format!("{MODE_CATEGORY}/{mode}"),
                    message: e.to_string(),
                })?;
            let patterns = owned_sources(&boundary);
            rules.push(CompiledRule::new(
                surface,
                RuleKind::Mode,
                MODE_CATEGORY,
                mode.to_uppercase(),
                SAFE_ALTERNATIVE,
                vec![mode.clone()],
                patterns,
                Arc::new(GuardedMatcher::new(detector.clone(), boundary)),
            ));
        }
    }

    if !rules.is_empty() {
        let patterns = detector
            .source()
            .map(|s| vec![s.to_string()])
            .unwrap_or_default();
        let matcher: Arc<dyn Matcher> = detector;
        rules.push(CompiledRule::new(
            surface,
            RuleKind::Concatenated,
            CONCATENATED_LABEL,
            CONCATENATED_LABEL,
            UNSPECIFIED_ALTERNATIVE,
            Vec::new(),
            patterns,
            matcher,
        ));
    }

    tracing::info!(
        surface = %surface,
        rules = rules.len(),
        fingerprint = taxonomy.fingerprint(),
        "Compiled rule set"
    );
    Ok(RuleSet::new(surface, taxonomy.fingerprint(), rules))
}

/// Compile the given surfaces, in the order given.
pub fn compile_surfaces(
    taxonomy: &Taxonomy,
    surfaces: &[Surface],
    options: CompileOptions,
) -> Result<Vec<RuleSet>, CompileError> {
    surfaces
        .iter()
        .map(|surface| compile_with(taxonomy, *surface, options))
        .collect()
}

/// Compile the function-name, macro-name and argument rule sets.
pub fn compile_all(taxonomy: &Taxonomy) -> Result<Vec<RuleSet>, CompileError> {
    compile_surfaces(taxonomy, Surface::all(), CompileOptions::default())
}

fn owned_sources(boundary: &BoundaryMatcher) -> Vec<String> {
    boundary.sources().into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> Taxonomy {
        Taxonomy::builder()
            .subcategory("Cipher", "DES", ["des"])
            .subcategory("Cipher", "3DES", ["3des"])
            .subcategory("PKE", "RSA", ["rsa"])
            .modes("block", ["ecb", "cbc"])
            .default_alternative("Cipher", "aes-gcm")
            .build()
            .unwrap()
    }

    #[test]
    fn rules_in_declaration_order() {
        let set = compile(&taxonomy(), Surface::FunctionName).unwrap();
        let paths: Vec<String> = set.rules().iter().map(CompiledRule::path).collect();
        assert_eq!(
            paths,
            vec![
                "Cipher/DES",
                "Cipher/3DES",
                "PKE/RSA",
                "Mode/CBC",
                "Mode/ECB",
                "Concatenated/Concatenated"
            ]
        );
        assert!(set.rules().iter().all(|r| r.surface() == Surface::FunctionName));
    }

    #[test]
    fn modes_can_be_left_out() {
        let options = CompileOptions {
            include_modes: false,
        };
        let set = compile_with(&taxonomy(), Surface::MacroName, options).unwrap();
        assert_eq!(set.len(), 4);
        assert!(set.rules().iter().all(|r| r.kind() != RuleKind::Mode));
    }

    #[test]
    fn empty_taxonomy_compiles_to_nothing() {
        let set = compile(&Taxonomy::empty(), Surface::Argument).unwrap();
        assert!(set.is_empty());
        assert!(set.classify("des_encrypt").is_none());
    }

    #[test]
    fn compile_all_covers_every_surface() {
        let sets = compile_all(&taxonomy()).unwrap();
        let surfaces: Vec<Surface> = sets.iter().map(RuleSet::surface).collect();
        assert_eq!(surfaces, Surface::all());
    }
}
