//! # DICOM volume import library
//!
//! This crate holds the part of a DICOM import pipeline that decides what
//! ends up in front of a viewer: which files form one 3-D volume, and what
//! their text attributes say.

//!
//! It is part of the dicom-rs ecosystem and leverages its components to
//! read the files. Two pieces do the actual work:
//!  - [`charset`] resolves the Specific Character Set (0008,0005) of a data
//!    set and decodes text values into UTF-8, following ISO 2022 escape
//!    sequences between the declared character sets.
//!  - [`partitioner`] splits series into volumes whenever the image
//!    orientation of a file diverges from the volumes seen so far, and
//!    names each volume after its series and orientation.
//!
//!  The [`volume_loader`] ties both to the filesystem. Files are read in
//!  parallel using rayon, grouped into series by Series Instance UID (and
//!  Series Date), sorted, and partitioned into volumes.
//!
//! # Examples
//!
//! ## Decoding a patient name
//!
//! ```
//! # use dicom_volume_import::charset::CharsetList;
//! let charsets = CharsetList::configure("ISO_IR 100");
//! assert_eq!(charsets.decode(b"Buc^J\xe9r\xf4me"), "Buc^Jérôme");
//! ```
//!
//! ## Splitting a directory into volumes
//!
//! ```no_run
//! # use dicom_volume_import::{PartitionOptions, SortBy, VolumeLoader};
//! let series = VolumeLoader::scan_directory("dicom", SortBy::InstanceNumber)
//!     .expect("should have read files from directory");
//! let volumes = VolumeLoader::partition_volumes(series, PartitionOptions::default())
//!     .expect("every file should have an orientation");
//! for (id, files) in &volumes {
//!     println!("{id}: {} files", files.len());
//! }
//! ```

pub mod attributes;
pub mod charset;
pub mod enums;
pub mod orientation;
pub mod partitioner;
pub mod volume_loader;

pub use attributes::{AttributeMap, AttributeSource, TagRequest, read_tags};
pub use charset::{CharsetList, DefinedTerm};
pub use enums::{SeenScope, SortBy};
pub use orientation::OrientationVector;
pub use partitioner::{PartitionOptions, VolumeGroups, VolumePartitioner};
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
