//! Dense numeric range expanded through a template.

use super::template::UrlTemplate;

/// Yields one URL per id in `[min, max]`, strictly ascending.
#[derive(Debug, Clone)]
pub struct RangeTargets {
    template: UrlTemplate,
    next: Option<u64>,
    max: u64,
}

impl RangeTargets {
    /// An empty interval (`min > max`) yields nothing.
    pub fn new(template: UrlTemplate, min: u64, max: u64) -> Self {
        Self {
            template,
            next: (min <= max).then_some(min),
            max,
        }
    }
}

impl Iterator for RangeTargets {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let id = self.next?;
        // checked_add keeps max == u64::MAX from wrapping back to zero.
        self.next = if id < self.max { id.checked_add(1) } else { None };
        Some(self.template.expand(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(id) => {
                let remaining = (self.max - id).saturating_add(1);
                let n = usize::try_from(remaining).unwrap_or(usize::MAX);
                (n, usize::try_from(remaining).ok())
            }
            None => (0, Some(0)),
        }
    }
}
