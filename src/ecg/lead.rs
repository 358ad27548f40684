use std::fmt;
use std::str::FromStr;
/// How leads are arranged on the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LeadLayout {
    /// Every channel stacked, full length, one trace per pair of rows.
    #[default]
    Regular,
    L3x4,
    L3x4Plus1,
    L3x4Plus3,
    L6x2,
    AverageComplex,
}
impl LeadLayout {
    pub const ALL: [LeadLayout; 6] = [
        LeadLayout::Regular,
        LeadLayout::L3x4,
        LeadLayout::L3x4Plus1,
        LeadLayout::L3x4Plus3,
        LeadLayout::L6x2,
        LeadLayout::AverageComplex,
    ];
    /// Menu label, also accepted by [`FromStr`].
    pub fn label(self) -> &'static str {
        match self {
            LeadLayout::Regular => "Regular",
            LeadLayout::L3x4 => "3×4",
            LeadLayout::L3x4Plus1 => "3×4+1",
            LeadLayout::L3x4Plus3 => "3×4+3",
            LeadLayout::L6x2 => "6×2",
            LeadLayout::AverageComplex => "Average Complex",
        }
    }
}
impl fmt::Display for LeadLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
impl FromStr for LeadLayout {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LeadLayout::ALL
            .into_iter()
            .find(|lead| lead.label() == wanted || lead.label().replace('×', "x") == wanted)
            .ok_or_else(|| format!("unknown lead layout {wanted:?}"))
    }
}
/// Check-mark bookkeeping for the lead layout menu.
///
/// Exactly one entry is checked. Picking the checked entry again changes nothing; picking
/// another one moves the check and reports a single selection change.
#[derive(Clone, Copy, Debug, Default)]
pub struct LeadMenu {
    checked: LeadLayout,
}
impl LeadMenu {
    pub fn new(checked: LeadLayout) -> Self {
        Self { checked }
    }
    pub fn checked(&self) -> LeadLayout {
        self.checked
    }
    pub fn is_checked(&self, lead: LeadLayout) -> bool {
        self.checked == lead
    }
    /// Returns `true` when the selection actually changed.
    pub fn select(&mut self, lead: LeadLayout) -> bool {
        if self.checked == lead {
            return false;
        }
        self.checked = lead;
        true
    }
}
