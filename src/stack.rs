//! Stack growth for the recursive passes.
//!
//! The parser, resolver and interpreter all recurse once per level of
//! syntactic nesting (and the interpreter once more per Lox call).  Each
//! recursive step goes through [`ensure_sufficient_stack`], which moves to a
//! freshly allocated segment when the current one runs low, so deep input
//! never overflows the host thread's stack.

/// Grow when less than this much stack is left (128 KiB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment (1 MiB).
const STACK_PER_SEGMENT: usize = 1024 * 1024;

/// Run `f`, first switching stacks if the current one is nearly exhausted.
#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_SEGMENT, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: usize) -> usize {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
    }

    #[test]
    fn recursion_far_beyond_the_thread_stack_completes() {
        assert_eq!(depth(200_000), 200_000);
    }
}
