/// Pair of buffers ping-ponged between frames: the one written during frame
/// `f` is the one read as "previous" during frame `f + 1`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DoubleBuffered<T> {
    a: T,
    b: T,
}

impl<T> DoubleBuffered<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    /// Returns whether `frame` writes to the alternate (`b`) buffer.
    pub fn is_alternate(frame: u32) -> bool {
        frame % 2 == 1
    }

    pub fn get(&self, alternate: bool) -> &T {
        if alternate {
            &self.b
        } else {
            &self.a
        }
    }

    /// Returns the buffer written during `frame` together with the buffer
    /// written during the frame before it.
    pub fn curr_and_past_mut(&mut self, frame: u32) -> (&mut T, &T) {
        if Self::is_alternate(frame) {
            (&mut self.b, &self.a)
        } else {
            (&mut self.a, &self.b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_pong() {
        let mut target = DoubleBuffered::new(vec![1], vec![2]);

        for frame in [0, 2, 4] {
            let (curr, past) = target.curr_and_past_mut(frame);

            assert_eq!(vec![2], *past);

            curr.push(frame);
        }

        let (curr, past) = target.curr_and_past_mut(1);

        assert_eq!(vec![2], *curr);
        assert_eq!(vec![1, 0, 2, 4], *past);
        assert_eq!(&vec![1, 0, 2, 4], target.get(false));
        assert!(!DoubleBuffered::<()>::is_alternate(0));
        assert!(DoubleBuffered::<()>::is_alternate(7));
    }
}
