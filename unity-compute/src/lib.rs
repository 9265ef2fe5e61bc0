//! Expression model and bounded symbolic rewriting used by the `unity` expression generator.
//!
//! The [`symbolic`] module holds the expression tree, its canonical form and the rewriting engine
//! that reduces generated expressions to a normal form. The [`numeric`] module evaluates trees at
//! sample points, which is mainly useful to sanity-check the symbolic results.

pub mod numeric;
pub mod primitive;
pub mod symbolic;
