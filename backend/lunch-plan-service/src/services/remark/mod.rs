use crate::services::selector::Selector;
use rand::Rng;

/// Joins remark phrases in the generated text.
pub const REMARK_SEPARATOR: &str = "，";

/// Builds the order-remark text for a template: 2 or 3 distinct phrases,
/// capped at however many the template has.
pub fn compose_remark<R: Rng>(selector: &mut Selector<R>, phrases: &[String]) -> String {
    if phrases.is_empty() {
        return String::new();
    }

    let count = selector.pick_count(2, 3).min(phrases.len());
    selector.pick_many(phrases, count).join(REMARK_SEPARATOR)
}
