//! Background merging

use crate::model::{Element, Report, Step};

/// Drop background elements from a report and prepend their steps to every
/// scenario that follows them.
///
/// A later background replaces the earlier one. Scenarios that come before the
/// first background are left untouched. Must run once per report, before any
/// step sequence is read.
pub fn merge_backgrounds(report: &mut Report) {
    let elements = std::mem::take(&mut report.elements);
    report.elements = merge_elements(elements);
}

/// Element-level version of [`merge_backgrounds`]
pub fn merge_elements(elements: Vec<Element>) -> Vec<Element> {
    let capacity = elements.len();
    let (merged, _) = elements.into_iter().fold(
        (Vec::with_capacity(capacity), None::<Vec<Step>>),
        |(mut merged, background), mut element| {
            if element.is_background() {
                return (merged, Some(element.steps));
            }
            if let Some(steps) = &background {
                element.steps.splice(0..0, steps.iter().cloned());
            }
            merged.push(element);
            (merged, background)
        },
    );
    merged
}
