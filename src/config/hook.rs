use std::fmt;
use std::sync::Arc;

/// An opaque, side-effecting callback replayed against a host handle.
///
/// Hooks compare by identity: two hooks are equal only when they share the
/// same underlying closure. Registering the same hook twice keeps both
/// entries, so it runs twice.
pub struct Hook<T: ?Sized> {
    inner: Arc<dyn Fn(&mut T) + Send + Sync>,
}

impl<T: ?Sized> Hook<T> {
    pub fn new(f: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    pub fn call(&self, target: &mut T) {
        (self.inner)(target)
    }
}

impl<T: ?Sized> Clone for Hook<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> PartialEq for Hook<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: ?Sized> Eq for Hook<T> {}

impl<T: ?Sized> fmt::Debug for Hook<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook({:p})", Arc::as_ptr(&self.inner) as *const ())
    }
}

/// Runs every hook in order against `target`.
pub(crate) fn run_all<T: ?Sized>(hooks: &[Hook<T>], target: &mut T) {
    for hook in hooks {
        hook.call(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_are_equal() {
        let hook = Hook::<Vec<u8>>::new(|v| v.push(1));
        assert_eq!(hook, hook.clone());
    }

    #[test]
    fn test_identical_closures_are_distinct() {
        let a = Hook::<Vec<u8>>::new(|v| v.push(1));
        let b = Hook::<Vec<u8>>::new(|v| v.push(1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_run_all_preserves_order() {
        let hooks = vec![
            Hook::<Vec<u8>>::new(|v| v.push(1)),
            Hook::<Vec<u8>>::new(|v| v.push(2)),
            Hook::<Vec<u8>>::new(|v| v.push(3)),
        ];
        let mut out = Vec::new();
        run_all(&hooks, &mut out);
        assert_eq!(out, vec![1, 2, 3]);
    }
}
