//! # Path Patterns
//!
//! Route patterns and the matcher that tests request paths against them.
//!
//! | Pattern            | Example              | Matches                          |
//! |--------------------|----------------------|----------------------------------|
//! | Literal            | `"/users"`           | `/users` (case-insensitive)      |
//! | Parameterized      | `"/users/:id"`       | `/users/42`, capturing `id`      |
//! | Wildcard           | `"/files/*"`         | anything below `/files/`         |
//! | Regex              | `Regex::new("^/v\\d")` | whatever the expression accepts |
//! | AnyOf              | `["/a", "/b"]`       | either member                    |
//! | MatchAll           | `None::<&str>`       | every path                       |
//!
//! Middleware layers match their pattern as a prefix that ends on a segment
//! boundary; route layers must cover the whole path.

mod matcher;
mod pattern;

pub use matcher::{MatchOptions, PathMatch};
pub use pattern::{PathPattern, PathSpec, Shape, combine, normalize};
