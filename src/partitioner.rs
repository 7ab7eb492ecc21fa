use crate::{
    enums::SeenScope,
    orientation::{DEFAULT_EPSILON, OrientationVector},
};

use rayon::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Volume group identifier mapped to its files, in the order they were assigned.
pub type VolumeGroups<T> = BTreeMap<String, Vec<T>>;

#[derive(Debug, Error)]
#[error("Could not read the orientation of a file in group {group}")]
pub struct PartitionError<E>
where
    E: std::error::Error + 'static,
{
    pub group: String,
    #[source]
    pub source: E,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionOptions {
    /// Tolerance on the dot products of the row and column cosines.
    pub epsilon: f64,
    pub scope: SeenScope,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            scope: SeenScope::default(),
        }
    }
}

/// Splits series into volumes whose files share one image orientation.
///
/// Files are compared against the orientations seen so far in insertion
/// order and join the first one that matches, so the outcome depends on the
/// order of the input for orientations close to the tolerance.
#[derive(Debug, Default, Clone)]
pub struct VolumePartitioner {
    options: PartitionOptions,
}

/// Orientations already assigned to a volume group.
#[derive(Default)]
struct Seen {
    entries: Vec<(OrientationVector, String)>,
}

impl Seen {
    fn find(&self, orientation: &OrientationVector, epsilon: f64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(seen, _)| seen.approx_eq(orientation, epsilon))
            .map(|(_, id)| id.as_str())
    }
}

impl VolumePartitioner {
    pub fn new(options: PartitionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PartitionOptions {
        &self.options
    }

    /// Identifier of the volume group minted for `orientation` within `group`.
    pub fn volume_id(group: &str, orientation: &OrientationVector) -> String {
        format!("{}.{}", group, orientation.encode())
    }

    /// Partition every input group sequentially.
    ///
    /// # Errors
    ///
    /// Stops at the first file whose orientation cannot be read.
    pub fn partition<T, E, F>(
        &self,
        groups: impl IntoIterator<Item = (String, Vec<T>)>,
        mut orientation_of: F,
    ) -> Result<VolumeGroups<T>, PartitionError<E>>
    where
        E: std::error::Error + 'static,
        F: FnMut(&T) -> Result<OrientationVector, E>,
    {
        let mut volumes = VolumeGroups::new();
        let mut seen = Seen::default();

        for (group, files) in groups {
            if self.options.scope == SeenScope::Group {
                seen = Seen::default();
            }
            self.partition_group(&group, files, &mut orientation_of, &mut seen, &mut volumes)?;
        }

        Ok(volumes)
    }

    /// Partition the input groups in parallel.
    ///
    /// Each group gets its own list of seen orientations whatever the
    /// configured scope, since groups are not visited in a single order.
    pub fn partition_par<T, E, F>(
        &self,
        groups: Vec<(String, Vec<T>)>,
        orientation_of: F,
    ) -> Result<VolumeGroups<T>, PartitionError<E>>
    where
        T: Send,
        E: std::error::Error + Send + 'static,
        F: Fn(&T) -> Result<OrientationVector, E> + Sync,
    {
        let partial: Vec<VolumeGroups<T>> = groups
            .into_par_iter()
            .map(|(group, files)| {
                let mut volumes = VolumeGroups::new();
                let mut lookup = &orientation_of;
                self.partition_group(
                    &group,
                    files,
                    &mut lookup,
                    &mut Seen::default(),
                    &mut volumes,
                )?;
                Ok(volumes)
            })
            .collect::<Result<_, _>>()?;

        let mut volumes = VolumeGroups::new();
        for part in partial {
            for (id, mut files) in part {
                volumes.entry(id).or_default().append(&mut files);
            }
        }
        Ok(volumes)
    }

    fn partition_group<T, E, F>(
        &self,
        group: &str,
        files: Vec<T>,
        orientation_of: &mut F,
        seen: &mut Seen,
        volumes: &mut VolumeGroups<T>,
    ) -> Result<(), PartitionError<E>>
    where
        E: std::error::Error + 'static,
        F: FnMut(&T) -> Result<OrientationVector, E>,
    {
        for file in files {
            let orientation = orientation_of(&file).map_err(|source| PartitionError {
                group: group.to_string(),
                source,
            })?;

            let id = match seen.find(&orientation, self.options.epsilon) {
                Some(id) => id.to_string(),
                None => {
                    let id = Self::volume_id(group, &orientation);
                    debug!("New volume {} with orientation {}", id, orientation);
                    seen.entries.push((orientation, id.clone()));
                    id
                }
            };
            volumes.entry(id).or_default().push(file);
        }
        Ok(())
    }
}
