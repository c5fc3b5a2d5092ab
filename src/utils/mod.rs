/*!
# Utilities

Provides
- the [`property_map`] abstraction through which all algorithms access per-vertex and
  per-edge values (caller buffers, owned scratch or constants),
- [`MinKeyed`] / [`MaxKeyed`] heap entries with a total order on `f64` keys.

Apart from the property maps, you probably do not need to interact with this module directly.
*/

use std::cmp::Ordering;

use crate::Node;

pub mod property_map;

pub use property_map::*;

/// Entry of a `BinaryHeap` popping the *smallest* key first (ties by smaller node).
#[derive(Debug, Clone, Copy)]
pub struct MinKeyed {
    pub key: f64,
    pub node: Node,
}

/// Entry of a `BinaryHeap` popping the *largest* key first (ties by smaller node).
#[derive(Debug, Clone, Copy)]
pub struct MaxKeyed {
    pub key: f64,
    pub node: Node,
}

macro_rules! impl_keyed_order {
    ($entry:ident, |$a:ident, $b:ident| $cmp:expr) => {
        impl $entry {
            pub fn new(key: f64, node: Node) -> Self {
                Self { key, node }
            }
        }

        impl PartialEq for $entry {
            fn eq(&self, other: &Self) -> bool {
                self.cmp(other) == Ordering::Equal
            }
        }

        impl Eq for $entry {}

        impl PartialOrd for $entry {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $entry {
            fn cmp(&self, other: &Self) -> Ordering {
                let ($a, $b) = (self, other);
                $cmp.then_with(|| other.node.cmp(&self.node))
            }
        }
    };
}

impl_keyed_order!(MinKeyed, |a, b| b.key.total_cmp(&a.key));
impl_keyed_order!(MaxKeyed, |a, b| a.key.total_cmp(&b.key));

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use std::collections::BinaryHeap;

    #[test]
    fn keyed_heaps() {
        let keys = [(3.0, 0), (1.0, 1), (2.0, 2), (1.0, 3)];

        let mut heap: BinaryHeap<_> = keys.iter().map(|&(k, u)| MinKeyed::new(k, u)).collect();
        let order = std::iter::from_fn(|| heap.pop())
            .map(|e| e.node)
            .collect_vec();
        assert_eq!(order, vec![1, 3, 2, 0]);

        let mut heap: BinaryHeap<_> = keys.iter().map(|&(k, u)| MaxKeyed::new(k, u)).collect();
        let order = std::iter::from_fn(|| heap.pop())
            .map(|e| e.node)
            .collect_vec();
        assert_eq!(order, vec![0, 2, 1, 3]);
    }
}
