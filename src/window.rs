use crate::adapter::SequenceAdapter;
use crate::error::Result;
use ahash::AHashMap as HashMap;

const HASH_BASE: u64 = 0x100_0000_01b3;

/// Interned view of an adapter's sequence.
///
/// Fingerprints are replaced by dense symbol ids so window comparisons are
/// integer comparisons, and prefix hashes let most unequal windows be
/// rejected in O(1). Every hash match is confirmed element by element, so
/// results never depend on the hash.
#[derive(Debug, Clone)]
pub(crate) struct Sequence {
    /// Symbol id per position
    symbols: Vec<u32>,
    /// Last position a span starting at `i` may cover
    span_limit: Vec<usize>,
    /// Polynomial prefix hashes, `prefix[i]` covers `symbols[..i]`
    prefix: Vec<u64>,
    /// `HASH_BASE^i`
    powers: Vec<u64>,
}

impl Sequence {
    /// Reads every position from the adapter, interning fingerprints.
    ///
    /// Adapter errors are propagated unchanged.
    pub(crate) fn from_adapter<A: SequenceAdapter + ?Sized>(adapter: &A) -> Result<Self> {
        let len = adapter.len();
        let mut intern: HashMap<A::Fingerprint, u32> = HashMap::default();
        let mut symbols = Vec::with_capacity(len);
        let mut boundaries = Vec::with_capacity(len);

        for position in 0..len {
            let fingerprint = adapter.fingerprint(position)?;
            let next_id = intern.len() as u32;
            symbols.push(*intern.entry(fingerprint).or_insert(next_id));
            boundaries.push(adapter.boundary(position)?.is_some());
        }

        Ok(Self::from_parts(symbols, boundaries))
    }

    pub(crate) fn from_parts(symbols: Vec<u32>, boundaries: Vec<bool>) -> Self {
        debug_assert_eq!(symbols.len(), boundaries.len());
        let len = symbols.len();

        let mut span_limit = vec![0; len];
        let mut limit = len.saturating_sub(1);
        for i in (0..len).rev() {
            span_limit[i] = limit;
            if boundaries[i] && i > 0 {
                limit = i - 1;
            }
        }

        let mut prefix = Vec::with_capacity(len + 1);
        let mut powers = Vec::with_capacity(len + 1);
        prefix.push(0u64);
        powers.push(1u64);
        for (i, &symbol) in symbols.iter().enumerate() {
            prefix.push(
                prefix[i]
                    .wrapping_mul(HASH_BASE)
                    .wrapping_add(u64::from(symbol) + 1),
            );
            powers.push(powers[i].wrapping_mul(HASH_BASE));
        }

        Self {
            symbols,
            span_limit,
            prefix,
            powers,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.symbols.len()
    }

    pub(crate) fn symbols(&self) -> &[u32] {
        &self.symbols
    }

    /// Last position a span starting at `start` may reach without containing
    /// a boundary in its interior.
    pub(crate) fn span_limit(&self, start: usize) -> usize {
        self.span_limit[start]
    }

    /// Returns true if any position in `(start, end]` carries a boundary.
    pub(crate) fn crosses_boundary(&self, start: usize, end: usize) -> bool {
        end > self.span_limit[start]
    }

    fn window_hash(&self, start: usize, len: usize) -> u64 {
        self.prefix[start + len].wrapping_sub(self.prefix[start].wrapping_mul(self.powers[len]))
    }

    /// Compares the windows `[a, a+len)` and `[b, b+len)`.
    pub(crate) fn windows_equal(&self, a: usize, b: usize, len: usize) -> bool {
        if a == b {
            return true;
        }
        if self.window_hash(a, len) != self.window_hash(b, len) {
            return false;
        }
        self.symbols[a..a + len] == self.symbols[b..b + len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SliceAdapter;

    fn seq(tokens: &str) -> Sequence {
        let chars: Vec<char> = tokens.chars().collect();
        Sequence::from_adapter(&SliceAdapter::new(&chars)).unwrap()
    }

    #[test]
    fn test_interning_is_dense() {
        let s = seq("abcab");
        assert_eq!(s.symbols(), &[0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_windows_equal() {
        let s = seq("abcabcd");
        assert!(s.windows_equal(0, 3, 3));
        assert!(!s.windows_equal(1, 4, 3));
        assert!(s.windows_equal(2, 2, 4));
    }

    #[test]
    fn test_span_limit_without_boundaries() {
        let s = seq("abcd");
        for i in 0..4 {
            assert_eq!(s.span_limit(i), 3);
        }
    }

    #[test]
    fn test_span_limit_with_boundaries() {
        let s = Sequence::from_parts(
            vec![0, 1, 2, 0, 1, 2, 3],
            vec![false, false, false, true, false, false, false],
        );
        assert_eq!(s.span_limit(0), 2);
        assert_eq!(s.span_limit(2), 2);
        // A span may start on the boundary itself
        assert_eq!(s.span_limit(3), 6);
        assert!(s.crosses_boundary(0, 3));
        assert!(!s.crosses_boundary(0, 2));
        assert!(!s.crosses_boundary(3, 6));
    }

    #[test]
    fn test_boundary_at_zero_is_ignored() {
        let s = Sequence::from_parts(vec![0, 0], vec![true, false]);
        assert_eq!(s.span_limit(0), 1);
    }

    #[test]
    fn test_empty_sequence() {
        let s = seq("");
        assert_eq!(s.len(), 0);
    }
}
