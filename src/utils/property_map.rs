/*!
# Property Maps

Algorithms read and write per-vertex and per-edge values through the traits of this
module instead of touching raw slices. This decouples *where* values live from *how*
they are used:

- [`SliceMap`] aliases a caller-provided `&mut [V]` and writes through to it,
- [`ReadSliceMap`] aliases a caller-provided `&[V]` (capacities, weights, heuristics),
- [`VecMap`] is owned scratch storage that is discarded once the algorithm is done,
- [`ConstantMap`] returns the same value for every key and ignores writes.

Vertices are keyed by [`Node`], edges by [`EdgeHandle`] whose `index` is the dense key.
Buffer lengths are checked once when constructing a map via `for_vertices` / `for_edges`;
afterwards every access is plain indexing.
*/

use crate::{
    error::{GraphError, Result, check_buffer},
    ops::{GraphEdgeOrder, GraphNodeOrder, IndexedOutEdges},
    *,
};

/// Keys that map to a dense index of a property map.
pub trait PropertyKey: Copy {
    fn key_index(self) -> usize;
}

impl PropertyKey for Node {
    #[inline]
    fn key_index(self) -> usize {
        self as usize
    }
}

impl PropertyKey for EdgeHandle {
    #[inline]
    fn key_index(self) -> usize {
        self.index as usize
    }
}

/// Read access to values associated with keys of type `K`.
pub trait ReadPropertyMap<K: PropertyKey> {
    type Value: Copy;

    /// Returns the value stored for `key`.
    /// ** Panics if `key` is out of range **
    fn get(&self, key: K) -> Self::Value;
}

/// Read and write access to values associated with keys of type `K`.
pub trait PropertyMap<K: PropertyKey>: ReadPropertyMap<K> {
    /// Stores `value` for `key`.
    /// ** Panics if `key` is out of range **
    fn set(&mut self, key: K, value: Self::Value);
}

impl<K: PropertyKey, M: ReadPropertyMap<K>> ReadPropertyMap<K> for &M {
    type Value = M::Value;

    #[inline]
    fn get(&self, key: K) -> Self::Value {
        (**self).get(key)
    }
}

impl<K: PropertyKey, M: ReadPropertyMap<K>> ReadPropertyMap<K> for &mut M {
    type Value = M::Value;

    #[inline]
    fn get(&self, key: K) -> Self::Value {
        (**self).get(key)
    }
}

impl<K: PropertyKey, M: PropertyMap<K>> PropertyMap<K> for &mut M {
    #[inline]
    fn set(&mut self, key: K, value: Self::Value) {
        (**self).set(key, value)
    }
}

/// Property map writing through to a caller-owned buffer.
#[derive(Debug)]
pub struct SliceMap<'a, V> {
    data: &'a mut [V],
}

/// Read-only property map over a caller-owned buffer.
#[derive(Debug, Clone, Copy)]
pub struct ReadSliceMap<'a, V> {
    data: &'a [V],
}

impl<'a, V: Copy> SliceMap<'a, V> {
    /// Wraps the first `required` entries of `data`.
    ///
    /// # Errors
    /// Returns [`GraphError::BufferTooSmall`] if `data` has fewer than `required` entries.
    pub fn new(data: &'a mut [V], required: usize, what: &'static str) -> Result<Self> {
        check_buffer(what, data.len(), required)?;
        Ok(Self {
            data: &mut data[..required],
        })
    }

    /// Wraps a buffer with one entry per vertex of `graph`
    pub fn for_vertices<G: GraphNodeOrder>(
        data: &'a mut [V],
        graph: &G,
        what: &'static str,
    ) -> Result<Self> {
        Self::new(data, graph.len(), what)
    }

    /// Wraps a buffer with one entry per stored edge of `graph`
    pub fn for_edges<G: GraphEdgeOrder>(
        data: &'a mut [V],
        graph: &G,
        what: &'static str,
    ) -> Result<Self> {
        Self::new(data, graph.number_of_edges() as usize, what)
    }
}

impl<'a, V: Copy> ReadSliceMap<'a, V> {
    /// Wraps the first `required` entries of `data`.
    ///
    /// # Errors
    /// Returns [`GraphError::BufferTooSmall`] if `data` has fewer than `required` entries.
    pub fn new(data: &'a [V], required: usize, what: &'static str) -> Result<Self> {
        check_buffer(what, data.len(), required)?;
        Ok(Self {
            data: &data[..required],
        })
    }

    /// Wraps a buffer with one entry per vertex of `graph`
    pub fn for_vertices<G: GraphNodeOrder>(
        data: &'a [V],
        graph: &G,
        what: &'static str,
    ) -> Result<Self> {
        Self::new(data, graph.len(), what)
    }

    /// Wraps a buffer with one entry per stored edge of `graph`
    pub fn for_edges<G: GraphEdgeOrder>(
        data: &'a [V],
        graph: &G,
        what: &'static str,
    ) -> Result<Self> {
        Self::new(data, graph.number_of_edges() as usize, what)
    }
}

macro_rules! impl_slice_map_read {
    ($map:ident) => {
        impl<V: Copy> $map<'_, V> {
            /// Returns the number of entries of the map
            pub fn len(&self) -> usize {
                self.data.len()
            }

            /// Returns *true* if the map has no entries
            pub fn is_empty(&self) -> bool {
                self.data.is_empty()
            }

            /// Returns the underlying buffer
            pub fn as_slice(&self) -> &[V] {
                self.data
            }
        }

        impl<K: PropertyKey, V: Copy> ReadPropertyMap<K> for $map<'_, V> {
            type Value = V;

            #[inline]
            fn get(&self, key: K) -> V {
                self.data[key.key_index()]
            }
        }
    };
}

impl_slice_map_read!(SliceMap);
impl_slice_map_read!(ReadSliceMap);

impl<V: Copy> SliceMap<'_, V> {
    /// Overwrites every entry with `value`
    pub fn fill(&mut self, value: V) {
        self.data.fill(value);
    }
}

impl<K: PropertyKey, V: Copy> PropertyMap<K> for SliceMap<'_, V> {
    #[inline]
    fn set(&mut self, key: K, value: V) {
        self.data[key.key_index()] = value;
    }
}

/// Owned scratch property map.
#[derive(Debug, Clone, PartialEq)]
pub struct VecMap<V> {
    data: Vec<V>,
}

impl<V: Copy> VecMap<V> {
    /// Creates a map with `len` entries initialized to `value`
    pub fn new(len: usize, value: V) -> Self {
        Self {
            data: vec![value; len],
        }
    }

    /// Creates a map with one entry per vertex of `graph`
    pub fn for_vertices<G: GraphNodeOrder>(graph: &G, value: V) -> Self {
        Self::new(graph.len(), value)
    }

    /// Creates a map with one entry per stored edge of `graph`
    pub fn for_edges<G: GraphEdgeOrder>(graph: &G, value: V) -> Self {
        Self::new(graph.number_of_edges() as usize, value)
    }

    /// Overwrites every entry with `value`
    pub fn fill(&mut self, value: V) {
        self.data.fill(value);
    }

    /// Returns the number of entries of the map
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns *true* if the map has no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the underlying storage
    pub fn as_slice(&self) -> &[V] {
        &self.data
    }

    /// Consumes the map and returns the underlying storage
    pub fn into_inner(self) -> Vec<V> {
        self.data
    }
}

impl<V> From<Vec<V>> for VecMap<V> {
    fn from(data: Vec<V>) -> Self {
        Self { data }
    }
}

impl<K: PropertyKey, V: Copy> ReadPropertyMap<K> for VecMap<V> {
    type Value = V;

    #[inline]
    fn get(&self, key: K) -> V {
        self.data[key.key_index()]
    }
}

impl<K: PropertyKey, V: Copy> PropertyMap<K> for VecMap<V> {
    #[inline]
    fn set(&mut self, key: K, value: V) {
        self.data[key.key_index()] = value;
    }
}

/// Map returning the same value for every key; writes are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstantMap<V>(pub V);

impl<K: PropertyKey, V: Copy> ReadPropertyMap<K> for ConstantMap<V> {
    type Value = V;

    #[inline]
    fn get(&self, _key: K) -> V {
        self.0
    }
}

impl<K: PropertyKey, V: Copy> PropertyMap<K> for ConstantMap<V> {
    #[inline]
    fn set(&mut self, _key: K, _value: V) {}
}

/// Read-only property map evaluating a closure.
/// Useful for heuristics that are cheaper to compute than to store.
#[derive(Debug, Clone, Copy)]
pub struct FnMap<F>(pub F);

impl<K: PropertyKey, F: Fn(K) -> f64> ReadPropertyMap<K> for FnMap<F> {
    type Value = f64;

    #[inline]
    fn get(&self, key: K) -> f64 {
        (self.0)(key)
    }
}

/// Edge weights of a graph: either a borrowed array or unit weights.
#[derive(Debug, Clone, Copy)]
pub enum EdgeWeights<'a> {
    Slice(ReadSliceMap<'a, f64>),
    Unit,
}

impl<'a> From<Option<&'a [f64]>> for EdgeWeights<'a> {
    fn from(weights: Option<&'a [f64]>) -> Self {
        match weights {
            Some(data) => Self::Slice(ReadSliceMap { data }),
            None => Self::Unit,
        }
    }
}

impl ReadPropertyMap<EdgeHandle> for EdgeWeights<'_> {
    type Value = f64;

    #[inline]
    fn get(&self, key: EdgeHandle) -> f64 {
        match self {
            Self::Slice(map) => map.get(key),
            Self::Unit => 1.0,
        }
    }
}

/// Returns the first edge carrying a negative (or NaN) weight.
pub(crate) fn check_non_negative_weights<G, W>(graph: &G, weights: &W) -> Result<()>
where
    G: IndexedOutEdges,
    W: ReadPropertyMap<EdgeHandle, Value = f64>,
{
    match graph
        .edges()
        .map(|(e, _)| (e, weights.get(e)))
        .find(|(_, w)| w.is_nan() || *w < 0.0)
    {
        Some((e, weight)) => Err(GraphError::NegativeWeight {
            edge: e.index,
            weight,
        }),
        None => Ok(()),
    }
}
