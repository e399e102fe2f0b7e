use std::hash::BuildHasherDefault;

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;

use crate::taxonomy::PageRecord;
use crate::url;

/// A page together with the pages nested directly below it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub record: PageRecord,
    pub children: Vec<TreeNode>,
}

/// The top-level nodes of a site.
pub type Forest = Vec<TreeNode>;

impl TreeNode {
    pub fn new(record: PageRecord) -> Self {
        TreeNode { record, children: vec![] }
    }

    /// The number of nodes in this subtree, `self` included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }

    /// Depth-first, pre-order walk over this subtree.
    pub fn walk(&self) -> Box<dyn Iterator<Item = &TreeNode> + '_> {
        Box::new(std::iter::once(self).chain(self.children.iter().flat_map(|c| c.walk())))
    }
}

/// Arranges `pages` into a forest keyed by URL.
///
/// The root page (`/`) is left out. A page whose parent URL doesn't belong
/// to any page is placed at the top level. Children appear in the order of
/// `pages`, so callers wanting navigation order should sort first with
/// [`sort_pages()`](crate::taxonomy::sort_pages).
///
/// ```rust
/// use folio::{build_tree, PageRecord};
///
/// let pages = [
///     PageRecord::new("/", "Home"),
///     PageRecord::new("/guides/", "Guides"),
///     PageRecord::new("/guides/install/", "Install"),
///     PageRecord::new("/api/", "API"),
/// ];
///
/// let tree = build_tree(&pages);
/// assert_eq!(tree.len(), 2);
/// assert_eq!(&*tree[0].children[0].record.title, "Install");
/// ```
pub fn build_tree(pages: &[PageRecord]) -> Forest {
    let records: Vec<&PageRecord> = pages.iter().filter(|p| !p.is_root()).collect();

    let mut index: FxHashMap<&str, usize> =
        FxHashMap::with_capacity_and_hasher(records.len(), BuildHasherDefault::<FxHasher>::default());

    for (i, record) in records.iter().enumerate() {
        if let Some(prev) = index.insert(&*record.url, i) {
            tracing::warn!(url = %record.url, first = prev, last = i, "duplicate page url");
        }
    }

    let mut roots = vec![];
    let mut children: Vec<Vec<usize>> = vec![vec![]; records.len()];
    for (i, record) in records.iter().enumerate() {
        let Some(parent) = url::parent(&record.url) else {
            roots.push(i);
            continue;
        };

        match index.get(&*parent) {
            Some(&p) => children[p].push(i),
            None => {
                tracing::debug!(url = %record.url, %parent, "parent not found; promoting to top level");
                roots.push(i);
            }
        }
    }

    fn materialize(i: usize, records: &[&PageRecord], children: &mut [Vec<usize>]) -> TreeNode {
        let mut node = TreeNode::new(records[i].clone());
        for child in std::mem::take(&mut children[i]) {
            node.children.push(materialize(child, records, children));
        }

        node
    }

    roots.into_iter()
        .map(|i| materialize(i, &records, &mut children))
        .collect()
}
