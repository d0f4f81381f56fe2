// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async context preservation.

use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

use super::context_impl::Context;

/// A [`Future`] wrapper that preserves context across async executor boundaries.
///
/// Executors are free to poll a future on any worker thread, so the thread's
/// current context cannot be relied on inside async code. `ApplyContext` installs
/// its context as current for the duration of each poll and restores the previous
/// one afterwards. Annotations the future makes through
/// [`Context::annotate_current`] are kept for the next poll.
///
/// # Examples
///
/// ```rust
/// use ctxlog::context::{ApplyContext, Context};
///
/// async fn handle() -> usize {
///     Context::annotate_current("stage", "parsed");
///     Context::current().values().len()
/// }
///
/// # async fn example() {
/// let ctx = Context::new_tracked(Default::default());
/// let pairs = ApplyContext::new(ctx, handle()).await;
/// assert_eq!(pairs, 3);
/// # }
/// ```
pub struct ApplyContext<F> {
    context: Option<Context>,
    future: F,
}

impl<F> ApplyContext<F> {
    pub fn new(context: Context, future: F) -> Self {
        Self {
            context: Some(context),
            future,
        }
    }
}

/// Puts the prior context back even if the inner poll unwinds.
struct Restore<'a> {
    slot: &'a mut Option<Context>,
    prior: Option<Context>,
}

impl Drop for Restore<'_> {
    fn drop(&mut self) {
        if let Some(prior) = self.prior.take() {
            *self.slot = Some(prior.set_current());
        }
    }
}

impl<F> Future for ApplyContext<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        // safety: `future` is never moved out of the pinned wrapper; `context` is not structurally pinned
        let (slot, fut) = unsafe {
            let d = self.get_unchecked_mut();
            (&mut d.context, Pin::new_unchecked(&mut d.future))
        };
        let context = slot.take().unwrap_or_default();
        let _restore = Restore {
            prior: Some(context.set_current()),
            slot,
        };
        fut.poll(cx)
    }
}
