// SPDX-License-Identifier: MIT OR Apache-2.0

//! Propagated logging contexts.
//!
//! A [`Context`] carries the key/value metadata of one logical request or task.
//! Call sites annotate it as they learn things (a user id, an order number) and
//! every record logged with that context carries the accumulated pairs.
//!
//! # Overview
//!
//! - [`Context`]: owns a [`KeyValueLog`](crate::values::KeyValueLog) built with the
//!   [`Strategy`](crate::values::Strategy) chosen at construction
//! - [`ApplyContext`]: a [`Future`] wrapper that installs a context as the thread's
//!   current context around each poll
//! - request and trace ids: [`Context::new_tracked`], [`Context::set_tracked`]
//!
//! # Annotating
//!
//! Both in-place and value-style annotation are supported:
//!
//! ```rust
//! use ctxlog::context::Context;
//!
//! let mut ctx = Context::default();
//! ctx.annotate("user", "alice");
//!
//! let ctx = ctx.with_value("order", 42u32);
//! assert_eq!(ctx.lookup_str("user").as_deref(), Some("alice"));
//! assert_eq!(ctx.values().len(), 2);
//! ```
//!
//! # Forking
//!
//! Before handing a context to a concurrently running task that will annotate it,
//! fork it. The fork starts from the same pairs and diverges independently:
//!
//! ```rust
//! use ctxlog::context::Context;
//!
//! let mut parent = Context::default().with_value("job", "import");
//! let mut child = parent.fork();
//! std::thread::spawn(move || {
//!     child.annotate("shard", 3u8);
//! })
//! .join()
//! .unwrap();
//! parent.annotate("stage", "done");
//! assert!(parent.lookup("shard").is_none());
//! ```
//!
//! # Current context
//!
//! Each thread has a current context, used whenever a logging call does not pass
//! one explicitly. Async code that hops between threads should wrap its futures
//! in [`ApplyContext`].
//!
//! ```rust
//! use ctxlog::context::Context;
//!
//! Context::default().with_value("session", "s-1").set_current();
//! Context::annotate_current("step", 2u8);
//! assert_eq!(Context::current().values().len(), 2);
//! ```

mod apply_context;
mod context_impl;
mod track;

#[cfg(test)]
mod tests;

pub use apply_context::ApplyContext;
pub use context_impl::Context;
pub use track::{ID_LEN, REQUEST_ID_KEY, TRACE_ID_KEY, new_id};
