use nutri_model::SourceTag;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error(
        "id range overlap: {first} uses {first_start}..={first_end}, {second} starts at {second_start}"
    )]
    IdRangeOverlap {
        first: SourceTag,
        first_start: u32,
        first_end: u32,
        second: SourceTag,
        second_start: u32,
    },

    #[error("{tag} has {count} records, more than fit after id offset {offset}")]
    IdOverflow {
        tag: SourceTag,
        offset: u32,
        count: usize,
    },
}
