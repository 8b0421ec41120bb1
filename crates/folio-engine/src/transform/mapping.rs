/// Which side a position sticks to when content is inserted exactly at it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Before,
    After,
}

/// Position map of a single step: `old_size` positions at `start` were
/// replaced by `new_size` positions. A zero/zero map is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepMap {
    pub start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

impl StepMap {
    pub const IDENTITY: StepMap = StepMap {
        start: 0,
        old_size: 0,
        new_size: 0,
    };

    pub fn deletion(from: usize, to: usize) -> Self {
        Self {
            start: from,
            old_size: to - from,
            new_size: 0,
        }
    }

    pub fn insertion(at: usize, len: usize) -> Self {
        Self {
            start: at,
            old_size: 0,
            new_size: len,
        }
    }

    pub fn map(&self, pos: usize, bias: Bias) -> usize {
        if pos < self.start {
            return pos;
        }
        let end = self.start + self.old_size;
        if pos > end {
            return pos - self.old_size + self.new_size;
        }
        if self.old_size == 0 {
            return match bias {
                Bias::Before => self.start,
                Bias::After => self.start + self.new_size,
            };
        }
        if pos == end {
            return self.start + self.new_size;
        }
        if pos == self.start {
            return self.start;
        }
        match bias {
            Bias::Before => self.start,
            Bias::After => self.start + self.new_size,
        }
    }
}

/// Composition of the step maps of a transaction, in application order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    maps: Vec<StepMap>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, map: StepMap) {
        self.maps.push(map);
    }

    pub fn maps(&self) -> &[StepMap] {
        &self.maps
    }

    /// Map a position from before the first step to after the last
    pub fn map(&self, pos: usize, bias: Bias) -> usize {
        self.map_from(0, pos, bias)
    }

    /// Map a position that is valid after step `index - 1` through the remaining steps
    pub fn map_from(&self, index: usize, pos: usize, bias: Bias) -> usize {
        self.maps
            .iter()
            .skip(index)
            .fold(pos, |pos, map| map.map(pos, bias))
    }
}
