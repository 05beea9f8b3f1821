use crate::analyze::classifier::Size;
use crate::model::Intext;
use indexmap::IndexMap;
use itertools::iproduct;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum Event {
    Opened,
    Merged,
    Closed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Opened => "opened",
            Event::Merged => "merged",
            Event::Closed => "closed",
        }
    }
}

/// Counter key, e.g. `opened external small`.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub struct Label {
    pub event: Event,
    pub intext: Intext,
    pub size: Option<Size>,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.event.as_str(), self.intext)?;
        if let Some(size) = self.size {
            write!(f, " {size}")?;
        }
        Ok(())
    }
}

pub type Counters = IndexMap<Label, u64>;

/// Cross-product of the active dimensions, in report column order.
pub fn label_set(by_size: bool, closed: bool) -> Vec<Label> {
    let events = if closed {
        vec![Event::Opened, Event::Merged, Event::Closed]
    } else {
        vec![Event::Opened, Event::Merged]
    };
    let sizes = if by_size {
        Size::ALL.iter().copied().map(Some).collect::<Vec<_>>()
    } else {
        vec![None]
    };
    iproduct!(events, Intext::ALL, sizes)
        .map(|(event, intext, size)| Label {
            event,
            intext,
            size,
        })
        .collect()
}

pub fn blank_counters(labels: &[Label]) -> Counters {
    labels.iter().map(|label| (*label, 0)).collect()
}
