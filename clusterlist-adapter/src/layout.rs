use alloc::vec::Vec;

/// Vertical stack of slot heights with `O(log n)` offset queries and in-place updates.
///
/// Backed by a Fenwick tree over `u64` sums, so offsets of very long stacks don't overflow.
#[derive(Clone, Debug, Default)]
pub struct StackLayout {
    heights: Vec<u32>,
    tree: Vec<u64>, // 1-indexed
    total: u64,
}

impl StackLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the layout in `O(n)`.
    pub fn from_heights(heights: &[u32]) -> Self {
        let n = heights.len();
        let mut tree = alloc::vec![0u64; n + 1];
        let mut total = 0u64;
        for i in 1..=n {
            let h = u64::from(heights[i - 1]);
            total += h;
            tree[i] += h;
            let parent = i + lowest_bit(i);
            if parent <= n {
                tree[parent] += tree[i];
            }
        }
        Self {
            heights: heights.to_vec(),
            tree,
            total,
        }
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn height_of(&self, slot: usize) -> Option<u32> {
        self.heights.get(slot).copied()
    }

    pub fn clear(&mut self) {
        self.heights.clear();
        self.tree.clear();
        self.total = 0;
    }

    /// Appends a slot at the bottom of the stack.
    pub fn push(&mut self, height: u32) {
        let i = self.heights.len() + 1;
        let h = u64::from(height);
        // tree[i] covers the `lowest_bit(i)` slots ending at i.
        let covered = self.offset_of(i - 1) - self.offset_of(i - lowest_bit(i));
        if self.tree.is_empty() {
            self.tree.push(0);
        }
        self.tree.push(covered + h);
        self.heights.push(height);
        self.total += h;
    }

    /// Changes the height of an existing slot. Returns `false` if the slot doesn't exist.
    pub fn set(&mut self, slot: usize, height: u32) -> bool {
        let Some(old) = self.heights.get_mut(slot) else {
            return false;
        };
        let (old_h, new_h) = (u64::from(*old), u64::from(height));
        *old = height;
        if old_h == new_h {
            return true;
        }

        let n = self.heights.len();
        let mut i = slot + 1;
        while i <= n {
            self.tree[i] = self.tree[i] - old_h + new_h;
            i += lowest_bit(i);
        }
        self.total = self.total - old_h + new_h;
        true
    }

    /// Distance from the top of the stack to the top of `slot`.
    ///
    /// `slot == len()` yields the total height.
    pub fn offset_of(&self, slot: usize) -> u64 {
        let mut i = slot.min(self.heights.len());
        let mut sum = 0u64;
        while i > 0 {
            sum += self.tree[i];
            i &= i - 1;
        }
        sum
    }

    /// The slot covering `offset`, clamped to the last slot. `None` for an empty stack.
    pub fn slot_at(&self, offset: u64) -> Option<usize> {
        let n = self.heights.len();
        if n == 0 {
            return None;
        }

        // Largest prefix whose sum is <= offset.
        let mut idx = 0usize;
        let mut rest = offset;
        let mut step = highest_bit(n);
        while step != 0 {
            let next = idx + step;
            if next <= n && self.tree[next] <= rest {
                rest -= self.tree[next];
                idx = next;
            }
            step >>= 1;
        }
        Some(idx.min(n - 1))
    }
}

fn lowest_bit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_bit(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}
