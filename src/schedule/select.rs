use crate::foundation::{
    core::Fps,
    error::{ReelError, ReelResult},
};

/// Largest number of distinct stills that fit into one segment of `period_secs`.
pub fn image_budget(period_secs: f64, fps: Fps) -> ReelResult<usize> {
    fps.check_segment(period_secs)?;
    let budget = fps.secs_to_frames_floor(period_secs) as usize;
    if budget == 0 {
        return Err(ReelError::validation(format!(
            "a {period_secs}s segment at {:.3} fps holds no frames",
            fps.as_f64()
        )));
    }
    Ok(budget)
}

/// Thin `items` down to at most `budget` entries, keeping their order.
///
/// First pass keeps every `len / budget`-th item. If that still leaves too many, the surplus is
/// cut out of the middle of the list so both ends of the sequence survive.
pub fn downselect<T>(items: Vec<T>, budget: usize) -> Vec<T> {
    if budget == 0 {
        return Vec::new();
    }
    if items.len() <= budget {
        return items;
    }

    let step = items.len() / budget;
    let mut kept: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| i.is_multiple_of(step).then_some(item))
        .collect();

    if kept.len() > budget {
        let excess = kept.len() - budget;
        let start = kept.len() / 2 - excess / 2;
        kept.drain(start..start + excess);
    }

    debug_assert_eq!(kept.len(), budget);
    kept
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/select.rs"]
mod tests;
