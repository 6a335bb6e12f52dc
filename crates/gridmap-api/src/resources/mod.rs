//! Resource handlers
//!
//! Every mutation runs the same steps and stops at the first failure:
//!
//! ```text
//! resolve handles → content type → schema → bounds → persist → invalidate → respond
//! ```
//!
//! Nothing is invalidated unless the store committed. Paths to invalidate
//! come from the rows the store reports back from the commit, not from the
//! earlier lookup, since a parent may be renamed in between.

pub mod map;
pub mod observer;
pub mod obstacle;
