//! Merging selectors that share a sprite image.
//!
//! Each group becomes one rule carrying the shared `background-image`,
//! `background-size` and `background-repeat`. It goes into the innermost
//! rule list that holds every contributor, right before the first
//! contributor (or the group rule containing it). Contributing rules keep
//! only their per-image declarations, so the cascade lets them refine the
//! merged rule.

use std::collections::HashMap;

use crate::css::{Declaration, Node, Rule};

/// Rules referencing one sprite URL.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeGroup {
    pub url: String,
    /// Every contributing selector, in document order (duplicates kept).
    pub selectors: Vec<String>,
    pub background_image: String,
    pub background_size: String,
    /// Child indices from the stylesheet root to the innermost rule list
    /// holding every contributor.
    path: Vec<usize>,
    /// Index within that list of the first contributor, or of the group
    /// rule that contains it.
    index: usize,
}

impl OptimizeGroup {
    /// Move the insertion point up to the deepest list that also encloses
    /// `path`, anchored on the ancestor of the first contributor there.
    fn lift_to(&mut self, path: &[usize]) {
        let common = self
            .path
            .iter()
            .zip(path)
            .take_while(|(a, b)| a == b)
            .count();
        if common < self.path.len() {
            self.index = self.path[common];
            self.path.truncate(common);
        }
    }

    pub fn to_rule(&self) -> Rule {
        Rule::new(
            self.selectors.clone(),
            vec![
                Declaration::new("background-image", self.background_image.clone()),
                Declaration::new("background-size", self.background_size.clone()),
                Declaration::new("background-repeat", "no-repeat"),
            ],
        )
    }
}

/// Groups for one stylesheet, in first-seen order.
#[derive(Debug, Default)]
pub struct OptimizeGroups {
    groups: Vec<OptimizeGroup>,
    by_url: HashMap<String, usize>,
}

impl OptimizeGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule to the group for `url`, creating it on first sight.
    ///
    /// Later contributors add selectors, refresh the shared values, and
    /// lift the insertion point to the list they share with the earlier ones.
    pub fn record(
        &mut self,
        url: &str,
        selectors: &[String],
        background_image: String,
        background_size: String,
        path: &[usize],
        index: usize,
    ) {
        match self.by_url.get(url) {
            Some(&i) => {
                let group = &mut self.groups[i];
                group.selectors.extend_from_slice(selectors);
                group.background_image = background_image;
                group.background_size = background_size;
                group.lift_to(path);
            }
            None => {
                self.by_url.insert(url.to_string(), self.groups.len());
                self.groups.push(OptimizeGroup {
                    url: url.to_string(),
                    selectors: selectors.to_vec(),
                    background_image,
                    background_size,
                    path: path.to_vec(),
                    index,
                });
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptimizeGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Insert one merged rule per group into the tree.
    pub fn apply(self, rules: &mut Vec<Node>) {
        let mut plan: HashMap<Vec<usize>, Vec<(usize, usize, Rule)>> = HashMap::new();
        for (seq, group) in self.groups.iter().enumerate() {
            plan.entry(group.path.clone())
                .or_default()
                .push((group.index, seq, group.to_rule()));
        }

        splice(rules, &mut Vec::new(), &mut plan);
    }
}

/// Insert planned rules, deepest lists first so recorded indices still
/// refer to the untouched tree. Within a list, inserting from the back keeps
/// earlier indices valid.
fn splice(
    rules: &mut Vec<Node>,
    path: &mut Vec<usize>,
    plan: &mut HashMap<Vec<usize>, Vec<(usize, usize, Rule)>>,
) {
    if plan.is_empty() {
        return;
    }

    for (i, node) in rules.iter_mut().enumerate() {
        if let Node::Group(group) = node {
            path.push(i);
            splice(&mut group.rules, path, plan);
            path.pop();
        }
    }

    if let Some(mut inserts) = plan.remove(path.as_slice()) {
        inserts.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        for (index, _, rule) in inserts {
            let at = index.min(rules.len());
            rules.insert(at, Node::Rule(rule));
        }
    }
}
