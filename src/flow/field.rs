//! Double-buffered velocity field.
//!
//! Both components live in two slots. One slot is *current* (read during a
//! step), the other is *next* (written during a step). [`FlowField::swap`]
//! exchanges the roles without moving any data.
use crate::image::ImageF32;

/// Names of the two buffer slots. `Odd` starts out as the current slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Odd,
    Even,
}

impl Slot {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Slot::Odd => Slot::Even,
            Slot::Even => Slot::Odd,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Slot::Odd => 0,
            Slot::Even => 1,
        }
    }
}

/// Read access to one slot.
#[derive(Clone, Copy)]
pub struct FlowRef<'a> {
    pub u: &'a ImageF32,
    pub v: &'a ImageF32,
}

/// Write access to one slot.
pub struct FlowMut<'a> {
    pub u: &'a mut ImageF32,
    pub v: &'a mut ImageF32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowField {
    u: [ImageF32; 2],
    v: [ImageF32; 2],
    current: Slot,
}

impl FlowField {
    /// Zero velocity everywhere, `Odd` current.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            u: [ImageF32::new(w, h), ImageF32::new(w, h)],
            v: [ImageF32::new(w, h), ImageF32::new(w, h)],
            current: Slot::Odd,
        }
    }

    pub fn width(&self) -> usize {
        self.u[0].w
    }

    pub fn height(&self) -> usize {
        self.u[0].h
    }

    /// Slot read during the next step.
    pub fn current_slot(&self) -> Slot {
        self.current
    }

    pub fn slot(&self, slot: Slot) -> FlowRef<'_> {
        FlowRef {
            u: &self.u[slot.index()],
            v: &self.v[slot.index()],
        }
    }

    pub fn slot_mut(&mut self, slot: Slot) -> FlowMut<'_> {
        FlowMut {
            u: &mut self.u[slot.index()],
            v: &mut self.v[slot.index()],
        }
    }

    pub fn current(&self) -> FlowRef<'_> {
        self.slot(self.current)
    }

    pub fn current_mut(&mut self) -> FlowMut<'_> {
        self.slot_mut(self.current)
    }

    /// Borrow the current slot for reading and the next slot for writing.
    pub fn split(&mut self) -> (FlowRef<'_>, FlowMut<'_>) {
        let [u_odd, u_even] = &mut self.u;
        let [v_odd, v_even] = &mut self.v;
        match self.current {
            Slot::Odd => (
                FlowRef { u: u_odd, v: v_odd },
                FlowMut {
                    u: u_even,
                    v: v_even,
                },
            ),
            Slot::Even => (
                FlowRef {
                    u: u_even,
                    v: v_even,
                },
                FlowMut { u: u_odd, v: v_odd },
            ),
        }
    }

    /// Promote the next slot to current.
    pub fn swap(&mut self) {
        self.current = self.current.other();
    }

    /// Make `slot` current without touching data.
    pub fn set_current(&mut self, slot: Slot) {
        self.current = slot;
    }

    /// The `(u, v)` pair of `Odd` and `Even` slots, in that order.
    pub fn odd_even(&self) -> (FlowRef<'_>, FlowRef<'_>) {
        (self.slot(Slot::Odd), self.slot(Slot::Even))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_toggles_roles_without_copying() {
        let mut field = FlowField::new(3, 3);
        assert_eq!(field.current_slot(), Slot::Odd);
        {
            let (_, next) = field.split();
            next.u.set(1, 1, 2.5);
            next.v.set(1, 1, -1.0);
        }
        assert_eq!(field.current().u.get(1, 1), 0.0);
        field.swap();
        assert_eq!(field.current_slot(), Slot::Even);
        assert_eq!(field.current().u.get(1, 1), 2.5);
        assert_eq!(field.current().v.get(1, 1), -1.0);
        field.swap();
        assert_eq!(field.current_slot(), Slot::Odd);
        assert_eq!(field.slot(Slot::Even).u.get(1, 1), 2.5);
    }

    #[test]
    fn split_reads_current_and_writes_other_slot() {
        let mut field = FlowField::new(2, 2);
        field.swap();
        field.current_mut().u.fill(1.0);
        let (cur, next) = field.split();
        assert_eq!(cur.u.get(0, 0), 1.0);
        next.u.set(0, 0, 9.0);
        assert_eq!(field.slot(Slot::Odd).u.get(0, 0), 9.0);
    }
}
