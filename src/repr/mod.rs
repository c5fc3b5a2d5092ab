use crate::{
    error::{check_vertex, invalid_graph, invalid_input, raise_error_unless},
    ops::*,
    utils::*,
    *,
};
use std::ops::Range;

mod csr;
mod owned;

pub use csr::*;
pub use owned::*;
