use alloc::string::String;
use alloc::vec::Vec;

use vc_utils::hash::HashMap;

use crate::field::FieldType;

/// Buckets the ids of `fields` by the label `classify` gives them.
///
/// Fields are offered in id order, so every bucket is sorted.
pub(super) fn build(
    fields: &[FieldType],
    classify: &(dyn Fn(&FieldType) -> Option<String> + Send + Sync),
) -> HashMap<String, Vec<usize>> {
    let mut groups: HashMap<String, Vec<usize>> = HashMap::default();
    for field in fields {
        if let Some(label) = classify(field) {
            groups.entry(label).or_default().push(field.id());
        }
    }
    groups
}
