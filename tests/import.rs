use dicom_dictionary_std::tags;
use dicom_volume_import::{
    AttributeMap, AttributeSource, CharsetList, OrientationVector, PartitionOptions, SeenScope,
    TagRequest, VolumePartitioner, orientation::OrientationError, read_tags,
};
use std::collections::HashMap;

/// A batch of files with their raw attributes, as handed over by the reader.
fn batch() -> Vec<(&'static str, AttributeMap)> {
    let file = |series: &str, name: &[u8], orientation: &str| {
        AttributeMap::new()
            .with(tags::SPECIFIC_CHARACTER_SET, "ISO 2022 IR 100\\ISO 2022 IR 144")
            .with(tags::SERIES_INSTANCE_UID, series)
            .with(tags::PATIENT_NAME, name.to_vec())
            .with(tags::IMAGE_ORIENTATION_PATIENT, orientation)
    };

    vec![
        ("s1", file("1.2.1", b"J\xe9r\xf4me", "1\\0\\0\\0\\1\\0")),
        ("s2", file("1.2.1", b"J\xe9r\xf4me", "1\\0\\0\\0\\1\\0")),
        ("s3", file("1.2.1", b"J\xe9r\xf4me", "0\\1\\0\\1\\0\\0")),
        ("s4", file("1.2.2", b"\x1b-L\xb8\xd2\xd0\xdd", "1\\0\\0\\0\\0\\-1")),
    ]
}

fn orientation_of(attributes: &AttributeMap) -> Result<OrientationVector, OrientationError> {
    let text = attributes
        .text_bytes(tags::IMAGE_ORIENTATION_PATIENT)
        .ok_or(OrientationError::Missing)?;
    let values = String::from_utf8_lossy(&text)
        .split('\\')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| OrientationError::NotNumeric)?;
    OrientationVector::from_values(&values)
}

fn by_series(files: Vec<(&'static str, AttributeMap)>) -> Vec<(String, Vec<AttributeMap>)> {
    let mut series: Vec<(String, Vec<AttributeMap>)> = Vec::new();
    for (_, attributes) in files {
        let uid = String::from_utf8_lossy(
            &attributes
                .text_bytes(tags::SERIES_INSTANCE_UID)
                .expect("series uid"),
        )
        .into_owned();
        match series.iter_mut().find(|(id, _)| *id == uid) {
            Some((_, files)) => files.push(attributes),
            None => series.push((uid, vec![attributes])),
        }
    }
    series
}

#[test]
fn imports_batch_into_volumes() {
    let options = PartitionOptions {
        scope: SeenScope::Group,
        ..Default::default()
    };
    let volumes = VolumePartitioner::new(options)
        .partition(by_series(batch()), orientation_of)
        .expect("every file has an orientation");

    let sizes: HashMap<_, _> = volumes.iter().map(|(id, f)| (id.as_str(), f.len())).collect();
    assert_eq!(
        sizes,
        HashMap::from([
            ("1.2.1.1S0S0S0S1S0", 2),
            ("1.2.1.0S1S0S1S0S0", 1),
            ("1.2.2.1S0S0S0S0SN1", 1),
        ])
    );

    let requests: Vec<TagRequest> = ["@0010|0010", "0020|000e"]
        .iter()
        .map(|s| s.parse().expect("valid request"))
        .collect();

    let first = &volumes["1.2.1.1S0S0S0S1S0"][0];
    let values = read_tags(first, &requests);
    assert_eq!(values["0010|0010"], "Jérôme");
    assert_eq!(values["0020|000e"], "1.2.1");

    let other = &volumes["1.2.2.1S0S0S0S0SN1"][0];
    assert_eq!(read_tags(other, &requests)["0010|0010"], "Иван");
}

#[test]
fn parallel_partition_matches_sequential() {
    let options = PartitionOptions {
        scope: SeenScope::Group,
        ..Default::default()
    };
    let partitioner = VolumePartitioner::new(options);

    let sequential = partitioner
        .partition(by_series(batch()), orientation_of)
        .expect("partition");
    let parallel = partitioner
        .partition_par(by_series(batch()), orientation_of)
        .expect("partition");

    assert_eq!(sequential, parallel);
}

#[test]
fn malformed_orientation_is_reported() {
    let mut files = batch();
    files[1]
        .1
        .insert(tags::IMAGE_ORIENTATION_PATIENT, "1\\0\\0\\0\\1".to_string());

    let error = VolumePartitioner::default()
        .partition(by_series(files), orientation_of)
        .expect_err("one file has five cosines");

    assert_eq!(error.group, "1.2.1");
    assert_eq!(error.source, OrientationError::WrongLength(5));
}

#[test]
fn charset_list_is_shared_per_file() {
    let files = batch();
    let (_, attributes) = &files[3];
    let charsets = attributes.charsets();
    assert_eq!(charsets, CharsetList::configure("ISO 2022 IR 100\\ISO 2022 IR 144"));
    assert_eq!(charsets.terms().len(), 2);
}
