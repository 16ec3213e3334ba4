//! Stimulant tolerance carried by every actor and ticked once per action.

const MAX_TOLERANCE: u8 = 3;
const LEVEL_LABELS: [&str; 4] = ["No", "Low", "Medium", "High"];
const STIM_MODIFIERS: [i32; 4] = [0, -1, -2, -3];
const COUNTDOWN_MAX: [u32; 4] = [0, 20, 60, 120];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AilmentNotice {
    ToleranceIncreased,
    ToleranceMaxed,
    ToleranceFaded,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ailments {
    tolerance: u8,
    countdown: u32,
}

impl Ailments {
    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn level_label(&self) -> &'static str {
        LEVEL_LABELS[usize::from(self.tolerance)]
    }

    pub fn stim_modifier(&self) -> i32 {
        STIM_MODIFIERS[usize::from(self.tolerance)]
    }

    pub fn countdown_max(&self) -> u32 {
        COUNTDOWN_MAX[usize::from(self.tolerance)]
    }

    pub fn gain_tolerance(&mut self) -> AilmentNotice {
        if self.tolerance < MAX_TOLERANCE {
            self.tolerance += 1;
            self.countdown = self.countdown_max();
            AilmentNotice::ToleranceIncreased
        } else {
            self.countdown = self.countdown_max();
            AilmentNotice::ToleranceMaxed
        }
    }

    pub fn tick(&mut self) -> Option<AilmentNotice> {
        if self.countdown > 0 {
            self.countdown -= 1;
            None
        } else if self.tolerance != 0 {
            self.tolerance = 0;
            Some(AilmentNotice::ToleranceFaded)
        } else {
            None
        }
    }
}
