/// Fixed-capacity evaluation stack. The buffer is allocated once and never
/// grows; `top` is the number of live slots.
#[derive(Debug, Clone)]
pub struct Stack {
    slots: Box<[i32]>,
    top: usize,
}

impl Stack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: vec![0; capacity].into_boxed_slice(), top: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.top
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    /// Live values, bottom to top.
    pub fn as_slice(&self) -> &[i32] {
        &self.slots[..self.top]
    }

    pub fn clear(&mut self) {
        self.top = 0;
    }

    /// Room for `n` more values.
    pub fn has_room(&self, n: usize) -> bool {
        self.capacity() - self.top >= n
    }

    /// Returns `None` when the stack is full.
    pub fn push(&mut self, v: i32) -> Option<()> {
        let slot = self.slots.get_mut(self.top)?;
        *slot = v;
        self.top += 1;
        Some(())
    }

    pub fn pop(&mut self) -> Option<i32> {
        self.top = self.top.checked_sub(1)?;
        Some(self.slots[self.top])
    }

    /// Value `depth` slots below the top (0 is the top itself).
    pub fn peek(&self, depth: usize) -> Option<i32> {
        let idx = self.top.checked_sub(depth + 1)?;
        Some(self.slots[idx])
    }

    /// Mutable access to the value `depth` slots below the top.
    pub fn peek_mut(&mut self, depth: usize) -> Option<&mut i32> {
        let idx = self.top.checked_sub(depth + 1)?;
        self.slots.get_mut(idx)
    }

    /// Moves the value `depth` slots below the top onto the top, closing the gap.
    pub fn lift(&mut self, depth: usize) -> Option<()> {
        let src = self.top.checked_sub(depth + 1)?;
        let v = self.slots[src];
        self.slots.copy_within(src + 1..self.top, src);
        self.slots[self.top - 1] = v;
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_until_full() {
        let mut s = Stack::with_capacity(2);
        assert_eq!(s.push(1), Some(()));
        assert_eq!(s.push(2), Some(()));
        assert_eq!(s.push(3), None);
        assert_eq!(s.as_slice(), &[1, 2]);
        assert!(!s.has_room(1));
    }

    #[test]
    fn pop_empty() {
        let mut s = Stack::with_capacity(4);
        assert_eq!(s.pop(), None);
        assert!(s.is_empty());
    }

    #[test]
    fn peek_by_depth() {
        let mut s = Stack::with_capacity(4);
        for v in [10, 20, 30] {
            s.push(v).unwrap();
        }
        assert_eq!(s.peek(0), Some(30));
        assert_eq!(s.peek(2), Some(10));
        assert_eq!(s.peek(3), None);
        *s.peek_mut(1).unwrap() = 25;
        assert_eq!(s.as_slice(), &[10, 25, 30]);
    }

    #[test]
    fn lift_moves_to_top() {
        let mut s = Stack::with_capacity(8);
        for v in [40, 60, 50, 50, 40] {
            s.push(v).unwrap();
        }
        s.lift(3).unwrap();
        assert_eq!(s.as_slice(), &[40, 50, 50, 40, 60]);
        s.lift(0).unwrap();
        assert_eq!(s.as_slice(), &[40, 50, 50, 40, 60]);
        assert_eq!(s.lift(5), None);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut s = Stack::with_capacity(3);
        s.push(7).unwrap();
        s.clear();
        assert_eq!(s.len(), 0);
        assert_eq!(s.capacity(), 3);
    }
}
