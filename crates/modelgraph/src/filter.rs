//! Model subsetting.
//!
//! Produces a reduced [`ModelManager`] that only carries the declarations
//! selected by a predicate over their fully qualified identifiers.

use std::collections::HashSet;

use log::debug;

use modelgraph_core::{identifier::QualifiedName, model::ModelManager};

/// Returns a copy of `manager` keeping only the declarations whose fully
/// qualified identifier satisfies `keep`.
///
/// Files left without declarations are dropped. Imports are pruned when they
/// name a declaration that was removed; a wildcard import (`ns.*`) survives
/// while any kept declaration lives in that namespace. Imports of names that
/// are not part of the model at all are left untouched.
///
/// # Examples
///
/// ```
/// use modelgraph::filter::filter_model;
/// use modelgraph_core::model::{ClassDeclaration, ModelFile, ModelManager};
///
/// let manager = ModelManager::from_files(vec![
///     ModelFile::new("org.a@1.0.0")
///         .with_declaration(ClassDeclaration::new("Kept"))
///         .with_declaration(ClassDeclaration::new("Dropped")),
/// ]);
///
/// let subset = filter_model(&manager, |fqn| fqn.ends_with(".Kept"));
/// assert_eq!(subset.files()[0].declarations().len(), 1);
/// ```
pub fn filter_model(manager: &ModelManager, keep: impl Fn(&str) -> bool) -> ModelManager {
    let all: HashSet<String> = manager
        .declarations()
        .map(|(file, decl)| file.qualify(decl.name()))
        .collect();
    let kept: HashSet<&str> = all
        .iter()
        .map(String::as_str)
        .filter(|fqn| keep(fqn))
        .collect();
    let kept_namespaces: HashSet<String> = kept
        .iter()
        .filter_map(|fqn| QualifiedName::parse(fqn).ok())
        .filter_map(|fqn| fqn.namespace().map(ToString::to_string))
        .collect();

    let keep_import = |import: &str| match import.strip_suffix(".*") {
        Some(namespace) => {
            kept_namespaces.contains(namespace)
                || !manager
                    .files()
                    .iter()
                    .any(|file| file.namespace() == namespace)
        }
        None => kept.contains(import) || !all.contains(import),
    };

    let mut subset = ModelManager::new();
    for file in manager.files() {
        let filtered = file.retain(
            |decl| kept.contains(file.qualify(decl.name()).as_str()),
            &keep_import,
        );
        if filtered.declarations().is_empty() {
            debug!(namespace = file.namespace(); "Dropping empty model file");
            continue;
        }
        subset.add_file(filtered);
    }

    debug!(
        declarations = kept.len(),
        files = subset.files().len();
        "Filtered model"
    );
    subset
}
