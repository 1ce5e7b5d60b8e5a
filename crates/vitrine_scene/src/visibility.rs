//! Selective visibility.
//!
//! Resolves a [`VisibilityPolicy`] once, at load time, into per-node
//! `visible` / draw-suppressed state. Only tagged, non-camera nodes are
//! affected; structural helpers and cameras keep whatever state they had.

use rustc_hash::FxHashSet;
use vitrine_core::NodeHandle;

use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityMode {
    /// Every tagged node is shown.
    #[default]
    All,
    /// Only the target nodes are shown, plus the ancestors they need.
    Selected,
}

#[derive(Debug, Clone, Default)]
pub struct VisibilityPolicy {
    pub mode: VisibilityMode,
    /// Node tags to show in [`VisibilityMode::Selected`].
    pub targets: FxHashSet<String>,
}

/// Counts produced by [`VisibilityPolicy::apply`], for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityReport {
    pub shown: usize,
    pub required_parents: usize,
    pub suppressed: usize,
    pub hidden: usize,
}

impl VisibilityPolicy {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: VisibilityMode::Selected,
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    /// Applies the policy to `model_root`'s subtree.
    ///
    /// Ancestors are collected up to, but excluding, the parent of
    /// `model_root`, so the model root itself can be a required parent.
    pub fn apply(&self, scene: &mut Scene, model_root: NodeHandle) -> VisibilityReport {
        let tagged = tagged_nodes(scene, model_root);

        let report = match self.mode {
            VisibilityMode::All => {
                for &handle in &tagged {
                    scene.nodes[handle].visible = true;
                }
                VisibilityReport {
                    shown: tagged.len(),
                    ..VisibilityReport::default()
                }
            }
            VisibilityMode::Selected => self.apply_selected(scene, model_root, &tagged),
        };

        log::info!(
            "Visibility {:?}: {} shown, {} required parents ({} suppressed), {} hidden",
            self.mode,
            report.shown,
            report.required_parents,
            report.suppressed,
            report.hidden
        );
        report
    }

    fn apply_selected(
        &self,
        scene: &mut Scene,
        model_root: NodeHandle,
        tagged: &[NodeHandle],
    ) -> VisibilityReport {
        // 1. Targets
        let targets: FxHashSet<NodeHandle> = tagged
            .iter()
            .copied()
            .filter(|&h| {
                scene.nodes[h]
                    .tag
                    .as_ref()
                    .is_some_and(|tag| self.targets.contains(tag))
            })
            .collect();

        for id in &self.targets {
            if !tagged.iter().any(|&h| scene.nodes[h].tag.as_ref() == Some(id)) {
                log::warn!("Visibility target '{id}' not found in model, skipped");
            }
        }

        // 2. Every ancestor of every target
        let stop = scene.get_node(model_root).and_then(|n| n.parent());
        let required: FxHashSet<NodeHandle> = targets
            .iter()
            .flat_map(|&t| scene.ancestors(t, stop))
            .collect();

        // 3. Apply
        let mut report = VisibilityReport::default();
        for &handle in tagged {
            if targets.contains(&handle) {
                scene.nodes[handle].visible = true;
                report.shown += 1;
            } else if required.contains(&handle) {
                scene.nodes[handle].visible = true;
                report.required_parents += 1;
                if scene.suppress_draw(handle) {
                    report.suppressed += 1;
                }
            } else {
                scene.nodes[handle].visible = false;
                report.hidden += 1;
            }
        }
        report
    }
}

fn tagged_nodes(scene: &Scene, root: NodeHandle) -> Vec<NodeHandle> {
    let mut out = Vec::new();
    scene.traverse(root, |handle, node| {
        if node.tag.is_some() && !node.is_camera() {
            out.push(handle);
        }
    });
    out
}
