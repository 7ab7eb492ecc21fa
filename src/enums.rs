/// Order of the files inside a series.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortBy {
    #[default]
    ImagePositionPatient,
    TablePosition,
    InstanceNumber,
    None,
}

/// How far the list of already seen orientations reaches during a partition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SeenScope {
    /// One list for the whole call. A file may join a volume group minted
    /// for an earlier input group with the same orientation.
    #[default]
    Call,
    /// A fresh list for every input group.
    Group,
}
