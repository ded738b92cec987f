/// Remaining stack below which a new segment is allocated.
const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each newly allocated stack segment.
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Runs `f`, first moving to a fresh heap-allocated stack segment if the
/// current one is nearly exhausted.
///
/// Recursive entry points (parser invocations, expression evaluation) go
/// through here, so nesting is bounded by the parser's and evaluator's own
/// limits rather than by the stack of the calling thread.
///
/// # Example
/// ```
/// use combicalc::util::stack::grow;
///
/// fn depth(n: u64) -> u64 {
///     grow(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
/// }
///
/// assert_eq!(depth(100_000), 100_000);
/// ```
pub fn grow<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, f)
}
