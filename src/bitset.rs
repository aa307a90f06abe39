use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use core::iter::{FusedIterator, Iterator};
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};
use thiserror::Error;

/// Number of bits in one storage word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// Computes the number of `u64` words needed to store `bit_count` bits.
///
/// # Examples
/// ```
/// use word_bitset::word_count;
///
/// assert_eq!(word_count(0), 0);
/// assert_eq!(word_count(64), 1);
/// assert_eq!(word_count(65), 2);
/// ```
pub const fn word_count(bit_count: usize) -> usize {
    bit_count.div_ceil(WORD_BITS)
}

/// Returned when the backing storage for a bitset cannot be allocated.
///
/// Constructors report this instead of aborting; on failure nothing was
/// allocated, so there is no partially built bitset to clean up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot allocate {words} words to back a bitset of {bits} bits")]
pub struct OutOfMemory {
    /// The requested number of bits.
    pub bits: usize,
    /// The number of words the allocation would have held.
    pub words: usize,
}

/// A mask selecting the low `width` bits of a word.
pub(crate) const fn low_ones(width: usize) -> u64 {
    if width >= WORD_BITS {
        // shift would be undefined / panic on u64
        !0u64
    } else {
        (1u64 << width) - 1
    }
}

/// The main type that stores the information.
///
/// A `Bitset` holds a fixed number of bits chosen at construction time,
/// packed into heap-allocated `u64` words. Bit `i` lives in word
/// `i / 64` at bit position `i % 64`, so index 0 is the least significant
/// bit of the first word.
///
/// When the bit count is not a multiple of 64, the unused high bits of the
/// last word are *padding*. The bulk bitwise operations work on whole words
/// and may leave garbage in the padding ([`in_place_bit_not`] in particular
/// sets it); every query re-masks the last word before interpreting it, so
/// the garbage is never observable through the public API. Only
/// [`as_words`] / [`as_mut_words`] expose it.
///
/// [`in_place_bit_not`]: Bitset::in_place_bit_not
/// [`as_words`]: Bitset::as_words
/// [`as_mut_words`]: Bitset::as_mut_words
#[derive(Clone)]
pub struct Bitset {
    size: usize,
    words: Vec<u64>,
}

impl Bitset {
    /// Creates a new bitset of `size` bits, all unset.
    ///
    /// `size` may be 0; no storage is allocated in that case.
    ///
    /// # Errors
    /// Returns [`OutOfMemory`] if the storage cannot be allocated. No
    /// partial allocation is left behind on failure.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::new(16).unwrap();
    /// assert_eq!(bitset.len(), 16);
    /// assert_eq!(bitset.popcount(), 0);
    /// ```
    pub fn new(size: usize) -> Result<Self, OutOfMemory> {
        let words = word_count(size);
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(words)
            .map_err(|_| OutOfMemory { bits: size, words })?;
        storage.resize(words, 0);
        Ok(Self {
            size,
            words: storage,
        })
    }

    /// Creates a new bitset of `size` bits, all set.
    ///
    /// # Errors
    /// Returns [`OutOfMemory`] if the storage cannot be allocated.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::with_all_set(10).unwrap();
    /// assert_eq!(bitset.popcount(), 10);
    /// ```
    #[inline]
    pub fn with_all_set(size: usize) -> Result<Self, OutOfMemory> {
        let mut bitset = Self::new(size)?;
        bitset.words.fill(!0u64);
        // keep the freshly constructed padding zeroed, like `new` does
        let mask = bitset.final_mask();
        if let Some(last) = bitset.words.last_mut() {
            *last &= mask;
        }
        Ok(bitset)
    }

    /// Constructs a bitset from a boolean slice, where `true` means set.
    ///
    /// The bitset's length is the slice's length.
    ///
    /// # Errors
    /// Returns [`OutOfMemory`] if the storage cannot be allocated.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::from_bools(&[true, false, true, false]).unwrap();
    /// assert_eq!(bitset.popcount(), 2);
    /// ```
    pub fn from_bools(bits: &[bool]) -> Result<Self, OutOfMemory> {
        let mut bitset = Self::new(bits.len())?;
        for (idx, bit) in bits.iter().enumerate() {
            if *bit {
                bitset.set(idx)
            }
        }
        Ok(bitset)
    }

    /// Constructs a bitset of `size` bits, setting only the indices provided
    /// by the iterator.
    ///
    /// All unspecified indices are left unset.
    ///
    /// # Errors
    /// Returns [`OutOfMemory`] if the storage cannot be allocated.
    ///
    /// # Panics
    /// Panics if any index is out of bounds (i.e., `>= size`).
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::from_ones(5, [0, 2, 4]).unwrap();
    /// assert!(bitset.is_set(0));
    /// assert!(!bitset.is_set(1));
    /// assert_eq!(bitset.popcount(), 3);
    /// ```
    pub fn from_ones<I: IntoIterator<Item = usize>>(
        size: usize,
        iter: I,
    ) -> Result<Self, OutOfMemory> {
        let mut bitset = Self::new(size)?;
        for idx in iter {
            assert!(idx < size, "Bit index {idx} out of bounds");
            bitset.set(idx);
        }
        Ok(bitset)
    }

    /// Returns the number of bits in the bitset.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::new(5).unwrap();
    /// assert_eq!(bitset.len(), 5);
    /// ```
    #[inline]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the bitset holds no bits at all.
    ///
    /// Note this is about the length, not about whether any bit is set.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of significant bits in the last storage word.
    ///
    /// Only meaningful for a non-empty bitset.
    #[inline]
    const fn final_block_size(&self) -> usize {
        match self.size % WORD_BITS {
            0 => WORD_BITS,
            rem => rem,
        }
    }

    /// Mask selecting the significant bits of the last storage word.
    #[inline]
    const fn final_mask(&self) -> u64 {
        low_ones(self.final_block_size())
    }

    /// Sets the bit at the given index.
    ///
    /// # Panics
    /// Panics if the index is out of bounds (i.e., `>= self.len()`).
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let mut bitset = Bitset::new(8).unwrap();
    /// assert!(!bitset.is_set(3));
    /// bitset.set(3);
    /// assert!(bitset.is_set(3));
    /// ```
    #[inline]
    pub fn set(&mut self, idx: usize) {
        assert!(idx < self.size, "Bit index {idx} out of bounds");
        self.words[idx / WORD_BITS] |= 1 << (idx % WORD_BITS);
    }

    /// Unsets the bit at the given index.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let mut bitset = Bitset::with_all_set(8).unwrap();
    /// assert!(bitset.is_set(3));
    /// bitset.unset(3);
    /// assert!(!bitset.is_set(3));
    /// ```
    #[inline]
    pub fn unset(&mut self, idx: usize) {
        assert!(idx < self.size, "Bit index {idx} out of bounds");
        self.words[idx / WORD_BITS] &= !(1 << (idx % WORD_BITS));
    }

    /// Toggles the bit at the given index.
    ///
    /// Returns the previous value of the bit (before the toggle).
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let mut bitset = Bitset::new(8).unwrap();
    /// assert_eq!(bitset.toggle(4), false); // flipped from false to true
    /// assert_eq!(bitset.toggle(4), true); // flipped from true to false
    /// ```
    #[inline]
    pub fn toggle(&mut self, idx: usize) -> bool {
        assert!(idx < self.size, "Bit index {idx} out of bounds");
        let bit = self.words[idx / WORD_BITS] & 1 << (idx % WORD_BITS) != 0;
        self.words[idx / WORD_BITS] ^= 1 << (idx % WORD_BITS);
        bit
    }

    /// Returns `true` if the bit at the given index is set.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let mut bitset = Bitset::new(8).unwrap();
    /// bitset.set(1);
    /// assert!(bitset.is_set(1));
    /// assert!(!bitset.is_set(0));
    /// ```
    #[inline]
    pub fn is_set(&self, idx: usize) -> bool {
        assert!(idx < self.size, "Bit index {idx} out of bounds");
        self.words[idx / WORD_BITS] & 1 << (idx % WORD_BITS) != 0
    }

    /// Returns the number of set bits in the bitset.
    ///
    /// Padding in the last word is masked out, so the result never exceeds
    /// `self.len()` even right after [`in_place_bit_not`].
    ///
    /// [`in_place_bit_not`]: Bitset::in_place_bit_not
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::from_bools(&[true, false, true, false]).unwrap();
    /// assert_eq!(bitset.popcount(), 2);
    /// ```
    pub fn popcount(&self) -> usize {
        let Some((&last, full)) = self.words.split_last() else {
            return 0;
        };
        let full_count: usize = full.iter().map(|w| w.count_ones() as usize).sum();
        full_count + (last & self.final_mask()).count_ones() as usize
    }

    /// Counts consecutive unset bits starting at the highest index,
    /// `self.len() - 1`, moving downward.
    ///
    /// Returns `self.len()` if every bit is unset, and 0 for an empty
    /// bitset.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::from_ones(5, [2]).unwrap();
    /// assert_eq!(bitset.leading_zeros(), 2);
    /// ```
    pub fn leading_zeros(&self) -> usize {
        let Some((&last, full)) = self.words.split_last() else {
            return 0;
        };
        // The mask's own high zeros must not count toward the run.
        let padding = WORD_BITS - self.final_block_size();
        let top = last & self.final_mask();
        if top != 0 {
            return top.leading_zeros() as usize - padding;
        }
        for (i, &word) in full.iter().rev().enumerate() {
            if word != 0 {
                return WORD_BITS * (i + 1) + word.leading_zeros() as usize - padding;
            }
        }
        self.size
    }

    /// Counts consecutive set bits starting at the highest index,
    /// `self.len() - 1`, moving downward.
    ///
    /// Returns `self.len()` if every bit is set, and 0 for an empty bitset.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::from_ones(5, [0, 2, 4]).unwrap();
    /// assert_eq!(bitset.leading_ones(), 1);
    /// ```
    pub fn leading_ones(&self) -> usize {
        let Some((&last, full)) = self.words.split_last() else {
            return 0;
        };
        // Force padding to ones so it joins the run instead of breaking it,
        // then subtract its contribution.
        let padding = WORD_BITS - self.final_block_size();
        let top = last | !self.final_mask();
        if top != !0u64 {
            return top.leading_ones() as usize - padding;
        }
        for (i, &word) in full.iter().rev().enumerate() {
            if word != !0u64 {
                return WORD_BITS * (i + 1) + word.leading_ones() as usize - padding;
            }
        }
        self.size
    }

    /// Counts consecutive unset bits starting at index 0, moving upward.
    ///
    /// Returns `self.len()` if every bit is unset, and 0 for an empty
    /// bitset.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::from_ones(5, [2]).unwrap();
    /// assert_eq!(bitset.trailing_zeros(), 2);
    /// ```
    pub fn trailing_zeros(&self) -> usize {
        let Some((&last, full)) = self.words.split_last() else {
            return 0;
        };
        for (i, &word) in full.iter().enumerate() {
            if word != 0 {
                return WORD_BITS * i + word.trailing_zeros() as usize;
            }
        }
        // Mask so a stray padding bit cannot cut the run short.
        let top = last & self.final_mask();
        if top != 0 {
            return WORD_BITS * full.len() + top.trailing_zeros() as usize;
        }
        self.size
    }

    /// Counts consecutive set bits starting at index 0, moving upward.
    ///
    /// Returns `self.len()` if every bit is set, and 0 for an empty bitset.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::from_ones(5, [0, 2, 4]).unwrap();
    /// assert_eq!(bitset.trailing_ones(), 1);
    /// ```
    pub fn trailing_ones(&self) -> usize {
        let Some((&last, full)) = self.words.split_last() else {
            return 0;
        };
        for (i, &word) in full.iter().enumerate() {
            if word != !0u64 {
                return WORD_BITS * i + word.trailing_ones() as usize;
            }
        }
        let top = last | !self.final_mask();
        if top != !0u64 {
            return WORD_BITS * full.len() + top.trailing_ones() as usize;
        }
        self.size
    }

    /// Performs an in-place bitwise OR with another bitset.
    ///
    /// Each bit in `self` is updated to the result of `self | other`. Works
    /// word at a time, padding included; no allocation takes place.
    ///
    /// Both operands must have the same length. A mismatch is a caller
    /// error, checked in debug builds only.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let mut a = Bitset::from_bools(&[true, false, true, false]).unwrap();
    /// let b = Bitset::from_bools(&[false, true, true, false]).unwrap();
    /// a.in_place_bit_or(&b);
    /// assert_eq!(a, Bitset::from_bools(&[true, true, true, false]).unwrap());
    /// ```
    #[inline]
    pub fn in_place_bit_or(&mut self, other: &Self) {
        debug_assert_eq!(self.size, other.size, "operand lengths must match");
        for (self_word, other_word) in self.words.iter_mut().zip(other.words.iter()) {
            *self_word |= other_word
        }
    }

    /// Performs an in-place bitwise AND with another bitset.
    ///
    /// Each bit in `self` is updated to the result of `self & other`. Works
    /// word at a time, padding included; no allocation takes place.
    ///
    /// Both operands must have the same length. A mismatch is a caller
    /// error, checked in debug builds only.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let mut a = Bitset::from_bools(&[true, false, true, false]).unwrap();
    /// let b = Bitset::from_bools(&[false, true, true, false]).unwrap();
    /// a.in_place_bit_and(&b);
    /// assert_eq!(a, Bitset::from_bools(&[false, false, true, false]).unwrap());
    /// ```
    #[inline]
    pub fn in_place_bit_and(&mut self, other: &Self) {
        debug_assert_eq!(self.size, other.size, "operand lengths must match");
        for (self_word, other_word) in self.words.iter_mut().zip(other.words.iter()) {
            *self_word &= other_word
        }
    }

    /// Performs an in-place bitwise XOR with another bitset.
    ///
    /// Each bit in `self` is updated to the result of `self ^ other`. Works
    /// word at a time, padding included; no allocation takes place.
    ///
    /// Both operands must have the same length. A mismatch is a caller
    /// error, checked in debug builds only.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let mut a = Bitset::from_bools(&[true, false, true, false]).unwrap();
    /// let b = Bitset::from_bools(&[false, true, true, false]).unwrap();
    /// a.in_place_bit_xor(&b);
    /// assert_eq!(a, Bitset::from_bools(&[true, true, false, false]).unwrap());
    /// ```
    #[inline]
    pub fn in_place_bit_xor(&mut self, other: &Self) {
        debug_assert_eq!(self.size, other.size, "operand lengths must match");
        for (self_word, other_word) in self.words.iter_mut().zip(other.words.iter()) {
            *self_word ^= other_word
        }
    }

    /// Inverts each bit of the bitset in place (bitwise NOT).
    ///
    /// Works word at a time, so previously zeroed padding bits in the last
    /// word come out set. Queries mask padding before interpreting it, so
    /// this is only observable through [`as_words`].
    ///
    /// [`as_words`]: Bitset::as_words
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let mut a = Bitset::from_bools(&[true, false, true, false]).unwrap();
    /// a.in_place_bit_not();
    /// assert_eq!(a, Bitset::from_bools(&[false, true, false, true]).unwrap());
    /// ```
    #[inline]
    pub fn in_place_bit_not(&mut self) {
        for word in &mut self.words {
            *word = !*word;
        }
    }

    /// Returns the raw storage words.
    ///
    /// Bits beyond index `self.len() - 1` in the last word are padding and
    /// carry no meaning; bulk bitwise operations are free to leave garbage
    /// there.
    #[inline]
    pub fn as_words(&self) -> &[u64] {
        &self.words
    }

    /// Returns the raw storage words mutably.
    ///
    /// Callers may write padding bits freely; every query masks them out.
    #[inline]
    pub fn as_mut_words(&mut self) -> &mut [u64] {
        &mut self.words
    }

    /// Returns an iterator over all bits as `bool`, from lowest to highest
    /// index.
    ///
    /// The iterator yields exactly `self.len()` items in order.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::from_bools(&[true, false, true]).unwrap();
    /// let bits: Vec<bool> = bitset.iter().collect();
    /// assert_eq!(bits, [true, false, true]);
    /// ```
    #[inline]
    pub fn iter(&self) -> BitsetIter<'_> {
        BitsetIter {
            bitset: self,
            idx: 0,
        }
    }

    /// Returns an iterator over the indices of all set bits, in ascending
    /// order.
    ///
    /// Runs in O(max(k, w)) where k is the number of set bits and w is the
    /// word count. Padding garbage in the last word is never yielded.
    ///
    /// # Examples
    /// ```
    /// use word_bitset::Bitset;
    ///
    /// let bitset = Bitset::from_bools(&[true, false, true, false, true]).unwrap();
    /// let ones: Vec<usize> = bitset.iter_ones().collect();
    /// assert_eq!(ones, [0, 2, 4]);
    /// ```
    #[inline]
    pub fn iter_ones(&self) -> IterOnes<'_> {
        IterOnes {
            words: &self.words,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
            base_bit_idx: 0,
            size: self.size,
        }
    }
}

/// An empty bitset of length 0.
///
/// Holds no storage; dropping it is a no-op.
impl Default for Bitset {
    fn default() -> Self {
        Self {
            size: 0,
            words: Vec::new(),
        }
    }
}

impl<'bitset> IntoIterator for &'bitset Bitset {
    type Item = bool;
    type IntoIter = BitsetIter<'bitset>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Equality of the significant bits.
///
/// Two bitsets are equal when they have the same length and agree on every
/// bit in `[0, len)`; padding is masked out of the comparison, so e.g. a
/// double [`in_place_bit_not`] compares equal to the original.
///
/// [`in_place_bit_not`]: Bitset::in_place_bit_not
impl PartialEq for Bitset {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size {
            return false;
        }
        // Equal sizes mean equal word counts.
        let (Some((&a, full_a)), Some((&b, full_b))) =
            (self.words.split_last(), other.words.split_last())
        else {
            return true;
        };
        full_a == full_b && a & self.final_mask() == b & other.final_mask()
    }
}

impl Eq for Bitset {}

impl Debug for Bitset {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "LSB -> ")?;
        for (i, bit) in self.iter().enumerate() {
            if i % 8 == 0 {
                write!(f, "{i}: ")?;
            }
            write!(f, "{}", if bit { '1' } else { '0' })?;
            if i % 8 == 7 && i + 1 < self.size {
                write!(f, " ")?;
            }
        }
        write!(f, " <- MSB")?;
        Ok(())
    }
}

impl BitAnd<&Bitset> for Bitset {
    type Output = Bitset;

    fn bitand(mut self, rhs: &Bitset) -> Self::Output {
        self.in_place_bit_and(rhs);
        self
    }
}

impl BitAndAssign<&Bitset> for Bitset {
    fn bitand_assign(&mut self, rhs: &Bitset) {
        self.in_place_bit_and(rhs)
    }
}

impl BitOr<&Bitset> for Bitset {
    type Output = Bitset;

    fn bitor(mut self, rhs: &Bitset) -> Self::Output {
        self.in_place_bit_or(rhs);
        self
    }
}

impl BitOrAssign<&Bitset> for Bitset {
    fn bitor_assign(&mut self, rhs: &Bitset) {
        self.in_place_bit_or(rhs)
    }
}

impl BitXor<&Bitset> for Bitset {
    type Output = Bitset;

    fn bitxor(mut self, rhs: &Bitset) -> Self::Output {
        self.in_place_bit_xor(rhs);
        self
    }
}

impl BitXorAssign<&Bitset> for Bitset {
    fn bitxor_assign(&mut self, rhs: &Bitset) {
        self.in_place_bit_xor(rhs)
    }
}

impl Not for Bitset {
    type Output = Bitset;

    fn not(mut self) -> Self::Output {
        self.in_place_bit_not();
        self
    }
}

/// Iterator over all bits in the bitset as `bool` values.
///
/// Yields `true` for set bits and `false` for unset bits, starting from
/// index 0.
///
/// Returned by [`Bitset::iter()`].
#[derive(Clone)]
pub struct BitsetIter<'bitset> {
    bitset: &'bitset Bitset,
    idx: usize,
}

impl Iterator for BitsetIter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.bitset.size {
            return None;
        }
        let word = self.bitset.words[self.idx / WORD_BITS];
        let bit = word & 1 << (self.idx % WORD_BITS);
        self.idx += 1;
        Some(bit != 0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bitset.size - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitsetIter<'_> {}

impl FusedIterator for BitsetIter<'_> {}

/// Iterator over the indices of set bits in the bitset.
///
/// Yields the positions of all set bits, in ascending order.
///
/// Returned by [`Bitset::iter_ones()`].
#[derive(Clone)]
pub struct IterOnes<'bitset> {
    words: &'bitset [u64],
    word_idx: usize,
    current: u64,
    base_bit_idx: usize,
    size: usize,
}

impl Iterator for IterOnes<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current != 0 {
                let tz = self.current.trailing_zeros() as usize;
                let idx = self.base_bit_idx + tz;
                if idx >= self.size {
                    // only padding bits remain
                    self.current = 0;
                    return None;
                }
                self.current &= self.current - 1; // unset LSB
                return Some(idx);
            }

            self.word_idx += 1;
            if self.word_idx >= self.words.len() {
                return None;
            }
            self.base_bit_idx += WORD_BITS;
            self.current = self.words[self.word_idx];
        }
    }
}

impl FusedIterator for IterOnes<'_> {}
