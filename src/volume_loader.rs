use crate::{
    attributes::{self, TagRequest},
    enums::SortBy,
    orientation::{OrientationError, OrientationVector},
    partitioner::{PartitionOptions, VolumeGroups, VolumePartitioner},
};

use dicom::object::{InMemDicomObject, open_file};
use dicom_dictionary_std::tags;
use rayon::prelude::*;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("No valid DICOM images found")]
    NoValidImages,

    #[error("Could not read the orientation of {}: {source}", path.display())]
    Orientation {
        path: PathBuf,
        #[source]
        source: OrientationError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),
}

/// What the loader keeps of one DICOM file.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceInfo {
    pub path: PathBuf,
    /// Series Instance UID, followed by the Series Date when there is one.
    pub series_id: String,
    pub order: Option<f64>,
    pub orientation: Result<OrientationVector, OrientationError>,
}

/// Series identifier mapped to its ordered slices.
pub type Series = BTreeMap<String, Vec<SliceInfo>>;

impl SliceInfo {
    /// Extract the slice information of an object, or `None` when it does
    /// not belong to any series.
    pub fn from_object(
        path: impl Into<PathBuf>,
        dicom_object: &InMemDicomObject,
        sort_by: SortBy,
    ) -> Option<Self> {
        let series_uid = text_value(dicom_object, tags::SERIES_INSTANCE_UID)?;
        let series_id = match text_value(dicom_object, tags::SERIES_DATE) {
            Some(date) => format!("{series_uid}.{date}"),
            None => series_uid,
        };

        Some(Self {
            path: path.into(),
            series_id,
            order: VolumeLoader::get_sort_order(dicom_object, sort_by),
            orientation: VolumeLoader::get_orientation(dicom_object),
        })
    }
}

fn text_value(dicom_object: &InMemDicomObject, tag: dicom::core::Tag) -> Option<String> {
    let value = dicom_object.element(tag).ok()?.to_str().ok()?;
    let value = value.trim_end_matches(['\0', ' ']).trim_start();
    (!value.is_empty()).then(|| value.to_string())
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Scan a directory containing .dcm files and group them into series
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be listed or holds no readable
    /// DICOM file with a Series Instance UID
    pub fn scan_directory(
        path: impl AsRef<Path>,
        sort_by: SortBy,
    ) -> Result<Series, VolumeLoaderError> {
        let mut paths: Vec<_> = fs::read_dir(path.as_ref())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"))
            })
            .collect();

        if paths.is_empty() {
            return Err(VolumeLoaderError::NoValidImages);
        }
        paths.sort();

        Self::scan_files(&paths, sort_by)
    }

    /// Read the given files in parallel and group them into series.
    ///
    /// Files that cannot be read are skipped.
    pub fn scan_files(
        paths: &[impl AsRef<Path> + Sync],
        sort_by: SortBy,
    ) -> Result<Series, VolumeLoaderError> {
        let slices: Vec<SliceInfo> = paths
            .par_iter()
            .filter_map(|path| {
                let path = path.as_ref();
                match open_file(path) {
                    Ok(dicom_object) => SliceInfo::from_object(path, &dicom_object, sort_by),
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        None
                    }
                }
            })
            .collect();

        if slices.is_empty() {
            return Err(VolumeLoaderError::NoValidImages);
        }

        Ok(Self::group_series(slices, sort_by))
    }

    /// Group slices by series, keeping the given order for equal sort keys.
    pub fn group_series(slices: Vec<SliceInfo>, sort_by: SortBy) -> Series {
        let mut series = Series::new();
        for slice in slices {
            series
                .entry(slice.series_id.clone())
                .or_default()
                .push(slice);
        }
        for (id, slices) in series.iter_mut() {
            Self::sort_slices(slices, sort_by);
            debug!("Series {} has {} slices", id, slices.len());
        }
        series
    }

    /// Split every series into volumes of a single orientation.
    ///
    /// # Errors
    ///
    /// Fails on the first slice without a usable Image Orientation (Patient)
    pub fn partition_volumes(
        series: Series,
        options: PartitionOptions,
    ) -> Result<VolumeGroups<PathBuf>, VolumeLoaderError> {
        let volumes = VolumePartitioner::new(options)
            .partition(series, |slice: &SliceInfo| {
                slice
                    .orientation
                    .clone()
                    .map_err(|source| VolumeLoaderError::Orientation {
                        path: slice.path.clone(),
                        source,
                    })
            })
            .map_err(|e| e.source)?;

        Ok(volumes
            .into_iter()
            .map(|(id, slices)| (id, slices.into_iter().map(|slice| slice.path).collect()))
            .collect())
    }

    /// Read the requested attributes of a single file
    ///
    /// dicom-rs decodes text values while parsing the file, so they already
    /// arrive as UTF-8 and the `@` prefix of a request changes nothing here.
    /// Use [`attributes::read_tags`] over an [`AttributeMap`](crate::AttributeMap)
    /// to decode raw values.
    pub fn read_tags(
        path: impl AsRef<Path>,
        requests: &[TagRequest],
    ) -> Result<BTreeMap<String, String>, VolumeLoaderError> {
        let dicom_object = open_file(path.as_ref())?;
        Ok(attributes::read_tags(&*dicom_object, requests))
    }

    fn get_sort_order(dicom_object: &InMemDicomObject, sort_by: SortBy) -> Option<f64> {
        match sort_by {
            SortBy::ImagePositionPatient => dicom_object
                .element(tags::IMAGE_POSITION_PATIENT)
                .ok()?
                .to_multi_float64()
                .ok()?
                .get(2)
                .copied(),
            SortBy::TablePosition => dicom_object
                .element(tags::TABLE_POSITION)
                .ok()?
                .to_float64()
                .ok(),
            SortBy::InstanceNumber => dicom_object
                .element(tags::INSTANCE_NUMBER)
                .ok()?
                .to_int::<i32>()
                .ok()
                .map(f64::from),
            SortBy::None => Some(0.0),
        }
    }

    fn get_orientation(
        dicom_object: &InMemDicomObject,
    ) -> Result<OrientationVector, OrientationError> {
        let values = dicom_object
            .element(tags::IMAGE_ORIENTATION_PATIENT)
            .map_err(|_| OrientationError::Missing)?
            .to_multi_float64()
            .map_err(|_| OrientationError::NotNumeric)?;
        OrientationVector::from_values(&values)
    }

    fn sort_slices(slices: &mut [SliceInfo], sort_by: SortBy) {
        if !matches!(sort_by, SortBy::None) {
            slices.sort_by(|a, b| {
                a.order
                    .partial_cmp(&b.order)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        if matches!(sort_by, SortBy::ImagePositionPatient) {
            slices.reverse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom::core::{DataElement, PrimitiveValue, VR, dicom_value};

    const AXIAL: [f64; 6] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    const CORONAL: [f64; 6] = [1.0, 0.0, 0.0, 0.0, 0.0, -1.0];

    fn object(
        series: &str,
        instance: i32,
        z: f64,
        orientation: Option<[f64; 6]>,
    ) -> InMemDicomObject {
        let mut dicom_object = InMemDicomObject::from_element_iter([
            DataElement::new(
                tags::SERIES_INSTANCE_UID,
                VR::UI,
                PrimitiveValue::from(series),
            ),
            DataElement::new(
                tags::INSTANCE_NUMBER,
                VR::IS,
                PrimitiveValue::from(instance.to_string()),
            ),
            DataElement::new(
                tags::IMAGE_POSITION_PATIENT,
                VR::DS,
                dicom_value!(F64, [0.0, 0.0, z]),
            ),
        ]);
        if let Some([a, b, c, d, e, f]) = orientation {
            dicom_object.put(DataElement::new(
                tags::IMAGE_ORIENTATION_PATIENT,
                VR::DS,
                dicom_value!(F64, [a, b, c, d, e, f]),
            ));
        }
        dicom_object
    }

    fn slice(name: &str, dicom_object: &InMemDicomObject, sort_by: SortBy) -> SliceInfo {
        SliceInfo::from_object(name, dicom_object, sort_by).expect("slice in a series")
    }

    #[test]
    fn extracts_slice_info() {
        let dicom_object = object("1.2.3", 7, -12.5, Some(AXIAL));
        let info = slice("a.dcm", &dicom_object, SortBy::InstanceNumber);
        assert_eq!(info.series_id, "1.2.3");
        assert_eq!(info.order, Some(7.0));
        assert_eq!(info.orientation, Ok(OrientationVector::new(AXIAL)));

        let dicom_object = object("1.2.3", 7, -12.5, None);
        let info = slice("a.dcm", &dicom_object, SortBy::ImagePositionPatient);
        assert_eq!(info.order, Some(-12.5));
        assert_eq!(info.orientation, Err(OrientationError::Missing));
    }

    #[test]
    fn series_date_restricts_series() {
        let mut dicom_object = object("1.2.3", 1, 0.0, Some(AXIAL));
        dicom_object.put(DataElement::new(
            tags::SERIES_DATE,
            VR::DA,
            PrimitiveValue::from("20240102"),
        ));
        assert_eq!(
            slice("a.dcm", &dicom_object, SortBy::None).series_id,
            "1.2.3.20240102"
        );
    }

    #[test]
    fn objects_without_series_are_ignored() {
        let dicom_object = InMemDicomObject::new_empty();
        assert_eq!(SliceInfo::from_object("a.dcm", &dicom_object, SortBy::None), None);
    }

    #[test]
    fn groups_and_sorts_series() {
        let slices = vec![
            slice("b2.dcm", &object("B", 2, 2.0, Some(AXIAL)), SortBy::ImagePositionPatient),
            slice("a1.dcm", &object("A", 1, 1.0, Some(AXIAL)), SortBy::ImagePositionPatient),
            slice("b1.dcm", &object("B", 1, 1.0, Some(AXIAL)), SortBy::ImagePositionPatient),
            slice("b3.dcm", &object("B", 3, 3.0, Some(AXIAL)), SortBy::ImagePositionPatient),
        ];

        let series = VolumeLoader::group_series(slices, SortBy::ImagePositionPatient);
        let names: Vec<_> = series["B"].iter().map(|s| s.path.to_str().unwrap()).collect();

        assert_eq!(series.len(), 2);
        assert_eq!(series["A"].len(), 1);
        assert_eq!(names, ["b3.dcm", "b2.dcm", "b1.dcm"]);
    }

    #[test]
    fn partitions_series_into_volumes() {
        let slices = vec![
            slice("a1.dcm", &object("A", 1, 0.0, Some(AXIAL)), SortBy::InstanceNumber),
            slice("a2.dcm", &object("A", 2, 0.0, Some(AXIAL)), SortBy::InstanceNumber),
            slice("a3.dcm", &object("A", 3, 0.0, Some(CORONAL)), SortBy::InstanceNumber),
        ];
        let series = VolumeLoader::group_series(slices, SortBy::InstanceNumber);

        let volumes = VolumeLoader::partition_volumes(series, PartitionOptions::default())
            .expect("partition");

        assert_eq!(volumes.len(), 2);
        assert_eq!(
            volumes["A.1S0S0S0S1S0"],
            [PathBuf::from("a1.dcm"), PathBuf::from("a2.dcm")]
        );
        assert_eq!(volumes["A.1S0S0S0S0SN1"], [PathBuf::from("a3.dcm")]);
    }

    #[test]
    fn missing_orientation_fails_partition() {
        let slices = vec![
            slice("a1.dcm", &object("A", 1, 0.0, Some(AXIAL)), SortBy::None),
            slice("a2.dcm", &object("A", 2, 0.0, None), SortBy::None),
        ];
        let series = VolumeLoader::group_series(slices, SortBy::None);

        let error = VolumeLoader::partition_volumes(series, PartitionOptions::default())
            .expect_err("missing orientation");

        assert!(matches!(
            error,
            VolumeLoaderError::Orientation { ref path, source: OrientationError::Missing }
                if path == Path::new("a2.dcm")
        ));
    }

    #[test]
    fn empty_scan_fails() {
        let paths: [&str; 0] = [];
        assert!(matches!(
            VolumeLoader::scan_files(&paths, SortBy::None),
            Err(VolumeLoaderError::NoValidImages)
        ));
    }
}
