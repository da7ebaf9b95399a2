use std::fmt;

/// A fixed-size secret byte buffer that zeroes itself on drop and never
/// prints its contents via `Debug`.
///
/// Hand-rolled rather than pulled from the `zeroize` crate: this type's
/// entire job is an 8-line `Drop` impl, not worth a dependency for.
#[derive(Clone)]
pub struct Secret<const N: usize>([u8; N]);

impl<const N: usize> Secret<N> {
    pub fn new(bytes: [u8; N]) -> Self {
        Secret(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> Drop for Secret<N> {
    fn drop(&mut self) {
        for b in self.0.iter_mut() {
            // Best-effort; a compiler is in principle free to elide a plain
            // store like this one.
            *b = 0;
        }
    }
}

impl<const N: usize> fmt::Debug for Secret<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret<{N}>(redacted)")
    }
}

impl<const N: usize> PartialEq for Secret<N> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<const N: usize> Eq for Secret<N> {}
