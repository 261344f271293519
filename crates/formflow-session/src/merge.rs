//! Deep merge of form answer state.

use std::collections::BTreeMap;

use formflow_types::{FormState, FormValue};

/// Merge `update` into `state`, right-biased.
///
/// - keys present on only one side survive
/// - nested records on both sides merge recursively
/// - lists are replaced wholesale, never concatenated or merged by position
/// - any other conflict resolves to the update's value
pub fn merge(state: FormState, update: FormState) -> FormState {
    FormState::from(merge_records(state.into_inner(), update.into_inner()))
}

fn merge_records(
    mut base: BTreeMap<String, FormValue>,
    update: BTreeMap<String, FormValue>,
) -> BTreeMap<String, FormValue> {
    for (key, value) in update {
        let merged = match (base.remove(&key), value) {
            (Some(FormValue::Record(old)), FormValue::Record(new)) => {
                FormValue::Record(merge_records(old, new))
            }
            (_, value) => value,
        };
        base.insert(key, merged);
    }
    base
}
