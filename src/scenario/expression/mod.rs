// SPDX-License-Identifier: MIT

//! Expression trees for scenario end conditions
//!
//! A script such as
//!
//! ```yaml
//! All:
//!   - Type: ElapsedTime
//!     Value: 10
//!   - Any:
//!       - Type: AlwaysTrue
//! ```
//!
//! is read once into an [`Expression`] and evaluated every tick.

mod parser;
mod procedure;
mod value;

pub use parser::read;
pub use procedure::Procedure;
pub use value::{Expression, Junction, Node, ParallelPolicy, Sequence};
