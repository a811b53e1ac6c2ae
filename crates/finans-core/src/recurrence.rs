//! Expands a recurring revenue or expense into independent dated records.

use uuid::Uuid;

use finans_domain::{PaymentStatus, Recurring};

use crate::{CoreError, CoreResult};

/// Upper bound on occurrences produced from one template.
pub const MAX_REPETITIONS: u32 = 1024;

/// Produces `repetitions` freestanding copies of `template`.
///
/// Occurrence `i` (0-based) is dated `i` frequency periods after the
/// template's anchor date, gets a fresh identity and starts `Pending`; all
/// other fields are copied verbatim and the value is never split. The copies
/// keep no link to each other or to the template.
///
/// When the template is not recurrent, has no frequency, or `repetitions` is
/// at most 1, a single record dated at the anchor is returned, keeping the
/// template's status.
pub fn expand_recurrence<T: Recurring>(template: &T, repetitions: u32) -> CoreResult<Vec<T>> {
    let anchor = template.anchor_date();
    let frequency = match template.frequency() {
        Some(frequency) if template.is_recurrent() && repetitions > 1 => frequency,
        _ => {
            return Ok(vec![template.reschedule(
                Uuid::new_v4(),
                anchor,
                template.status(),
            )])
        }
    };
    if repetitions > MAX_REPETITIONS {
        return Err(CoreError::Validation(format!(
            "{} repetitions exceeds the maximum of {}",
            repetitions, MAX_REPETITIONS
        )));
    }

    let mut occurrences = Vec::with_capacity(repetitions as usize);
    for index in 0..repetitions {
        let date = frequency.advance(anchor, index).ok_or_else(|| {
            CoreError::DateOutOfRange(format!(
                "{} advanced by {} {} periods",
                anchor, index, frequency
            ))
        })?;
        occurrences.push(template.reschedule(Uuid::new_v4(), date, PaymentStatus::Pending));
    }
    tracing::debug!(repetitions, %frequency, %anchor, "expanded recurring template");
    Ok(occurrences)
}
