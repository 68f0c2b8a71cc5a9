#![forbid(unsafe_code)]

//! Named diagram builders.
//!
//! Each entry populates an empty [`Graph`] and propagates the first
//! [`GraphError`] it hits. Entries are sorted by name.

use gitline_core::{BranchOptions, Color, CommitOptions, Graph, GraphError};

/// Populates a fresh graph.
pub type GraphBuilder = fn(&mut Graph) -> Result<(), GraphError>;

/// Branch colors shared by the workflow diagrams.
pub mod palette {
    use gitline_core::Color;

    pub const MASTER: Color = Color::Rgb(0xd6, 0x45, 0x45);
    pub const STAGING: Color = Color::Rgb(0xe0, 0x9b, 0x2d);
    pub const DEV: Color = Color::Rgb(0x3c, 0x8d, 0xd9);
    pub const FEATURE: Color = Color::Rgb(0x4c, 0xaf, 0x50);
    pub const TO_DEV: Color = Color::Rgb(0x7e, 0x57, 0xc2);
    pub const TO_STAGING: Color = Color::Rgb(0x26, 0xa6, 0x9a);
}

/// Every registered builder.
pub const CATALOG: &[(&str, GraphBuilder)] = &[
    ("local-squashing", local_squashing),
    ("local-squashing-history", local_squashing_history),
    ("submitting-a-hotfix", submitting_a_hotfix),
    ("submitting-to-foh", submitting_to_foh),
    ("submitting-to-staging", submitting_to_staging),
    ("test", feature_from_staging),
];

/// Registered names, sorted.
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(name, _)| *name)
}

#[must_use]
pub fn lookup(name: &str) -> Option<GraphBuilder> {
    CATALOG
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, builder)| *builder)
}

/// Human label for a name: dashes become spaces.
#[must_use]
pub fn label(name: &str) -> String {
    name.replace('-', " ")
}

fn none() -> CommitOptions {
    CommitOptions::default()
}

fn colored(color: Color) -> BranchOptions {
    BranchOptions::default().color(color)
}

fn pre_existing(graph: &mut Graph, names: &[&str]) -> Result<(), GraphError> {
    for name in names {
        graph.create_branch(*name, BranchOptions::default(), none())?;
    }
    Ok(())
}

fn feature_from_staging(graph: &mut Graph) -> Result<(), GraphError> {
    pre_existing(graph, &["staging"])?;
    graph.start()?;

    graph
        .branch_mut("staging")?
        .branch("feature", BranchOptions::default(), none())?
        .commit(none())?
        .commit(none())?
        .commit(none())?;

    graph.end()?;
    Ok(())
}

fn submitting_a_hotfix(graph: &mut Graph) -> Result<(), GraphError> {
    pre_existing(graph, &["master", "staging", "foh", "hotfix"])?;
    graph.start()?;

    for target in ["staging", "master", "foh"] {
        graph.merge(target, "hotfix", none().dashed())?;
    }

    graph.delete_branch("hotfix", none())?;
    graph.end()?;
    Ok(())
}

fn submitting_to_foh(graph: &mut Graph) -> Result<(), GraphError> {
    pre_existing(graph, &["foh", "feature"])?;
    graph.start()?;

    graph
        .branch_mut("feature")?
        .branch("to-foh", BranchOptions::default().index(1), none())?
        .merge("foh", none())?;

    graph.merge("foh", "to-foh", none().dashed())?;
    graph.end()?;
    Ok(())
}

fn submitting_to_staging(graph: &mut Graph) -> Result<(), GraphError> {
    pre_existing(graph, &["foh", "feature", "to-foh"])?;
    graph.start()?;

    graph
        .branch_mut("feature")?
        .branch("to-staging", BranchOptions::default().index(1), none())?
        .merge("foh", none())?;

    graph.merge("foh", "to-staging", none().dashed())?;
    graph.delete_branch("to-foh", none())?;
    graph.end()?;
    Ok(())
}

fn local_squashing(graph: &mut Graph) -> Result<(), GraphError> {
    graph.create_branch("master", colored(palette::MASTER), none())?;
    graph.create_branch("staging", colored(palette::STAGING), none())?;
    graph.create_branch("dev", colored(palette::DEV), none())?;
    graph.start()?;

    graph.commit("master", none())?;

    // Work on the feature.
    graph
        .branch_mut("master")?
        .branch("feature", colored(palette::FEATURE), "branch from master")?
        .commit("work 1")?
        .commit("work 2")?
        .commit("work 3")?;

    // Squash into to-dev and open the first PR.
    graph
        .branch_mut("dev")?
        .branch("to-dev", colored(palette::TO_DEV).index(3), "branch from dev")?
        .merge("feature", "squash feature v1")?;
    graph.merge("dev", "to-dev", none().message("PR to dev").dashed())?;

    // QA feedback.
    graph
        .branch_mut("feature")?
        .commit("work 4")?
        .commit("work 5")?
        .commit("work 6")?;

    graph
        .branch_mut("to-dev")?
        .merge("dev", none())?
        .merge("feature", "squash feature v2")?;
    graph.merge("dev", "to-dev", none().message("PR to dev 2").dashed())?;

    // Squash everything onto staging.
    graph
        .branch_mut("staging")?
        .branch("to-staging", colored(palette::TO_STAGING).index(2), "branch from staging")?
        .merge("feature", "squash feature v1 and 2")?;
    graph.merge("staging", "to-staging", "PR to staging")?;
    Ok(())
}

fn local_squashing_history(graph: &mut Graph) -> Result<(), GraphError> {
    graph.create_branch("master", colored(palette::MASTER), none())?;
    graph.create_branch("staging", colored(palette::STAGING), none())?;
    graph.create_branch("dev", colored(palette::DEV), none())?;
    graph.start()?;

    graph
        .branch_mut("master")?
        .branch("feature", colored(palette::FEATURE), "branch into feature")?;

    graph
        .branch_mut("dev")?
        .merge("feature", "feature v1")?
        .merge("feature", "feature v2")?;
    graph.merge("staging", "feature", "feature")?;
    graph.commit("staging", "revert feature")?;

    graph
        .branch_mut("dev")?
        .merge("feature", "feature v3")?
        .merge("feature", "feature v4")?;
    graph.merge("staging", "feature", "feature")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitline_core::EventKind;

    fn built(name: &str) -> Graph {
        let mut graph = Graph::new();
        lookup(name).unwrap()(&mut graph).unwrap();
        graph
    }

    fn branch_names(graph: &Graph) -> Vec<&str> {
        graph.branches().iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn catalog_is_sorted_and_unique() {
        let names: Vec<_> = names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn lookup_misses_unknown_names() {
        assert!(lookup("test").is_some());
        assert!(lookup("nope").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn label_replaces_dashes() {
        assert_eq!(label("submitting-a-hotfix"), "submitting a hotfix");
    }

    #[test]
    fn explicit_indices_reorder_lanes() {
        assert_eq!(
            branch_names(&built("local-squashing")),
            vec!["master", "staging", "to-staging", "dev", "to-dev", "feature"]
        );
        assert_eq!(branch_names(&built("submitting-to-foh")), vec!["foh", "to-foh", "feature"]);
        assert_eq!(
            branch_names(&built("submitting-to-staging")),
            vec!["foh", "to-staging", "feature", "to-foh"]
        );
    }

    #[test]
    fn hotfix_merges_are_dashed_and_branch_is_deleted() {
        let graph = built("submitting-a-hotfix");
        let merges: Vec<_> = graph
            .events()
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Merge { .. }))
            .map(|e| (e.branch.as_deref(), e.is_dashed()))
            .collect();
        assert_eq!(
            merges,
            vec![
                (Some("staging"), true),
                (Some("master"), true),
                (Some("foh"), true)
            ]
        );
        assert!(graph.events().iter().any(|e| e.kind == EventKind::Delete));
    }

    #[test]
    fn unlabelled_squash_merge_gets_default_message() {
        let graph = built("local-squashing");
        assert!(
            graph
                .events()
                .iter()
                .any(|e| e.message.as_deref() == Some("Merge branch 'dev' into to-dev"))
        );
    }

    #[test]
    fn palette_colors_are_applied() {
        let graph = built("local-squashing-history");
        assert_eq!(graph.branch("feature").unwrap().color, Some(palette::FEATURE));
        assert_eq!(graph.branch("master").unwrap().color, Some(palette::MASTER));
    }
}
