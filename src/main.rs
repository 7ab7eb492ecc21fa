use std::path::PathBuf;

use clap::Parser;
use dicom_volume_import::{
    PartitionOptions, SeenScope, SortBy, TagRequest, VolumeLoader, VolumeLoaderError,
    orientation::DEFAULT_EPSILON,
};
use tracing::{Level, error, info};

/// Split a directory of DICOM files into volumes of a single orientation
#[derive(Debug, Parser)]
#[command(version)]
struct App {
    /// Directory holding the .dcm files
    dir: PathBuf,

    /// Attribute to print for the first file of each volume,
    /// as gggg|eeee, prefixed with @ to decode it as text
    #[arg(short = 't', long = "tag")]
    tags: Vec<TagRequest>,

    /// Order of the files inside each series
    #[arg(long = "sort-by", value_enum, default_value_t = SortBy::ImagePositionPatient)]
    sort_by: SortBy,

    /// Tolerance on the dot products of the direction cosines
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,

    /// Only compare orientations within the same series
    #[arg(long = "per-series")]
    per_series: bool,

    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    let app = App::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(if app.verbose { Level::DEBUG } else { Level::INFO })
            .finish(),
    )
    .unwrap_or_else(|e| {
        eprintln!("{e}");
    });

    run(app).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(-2);
    });
}

fn run(app: App) -> Result<(), VolumeLoaderError> {
    let series = VolumeLoader::scan_directory(&app.dir, app.sort_by)?;
    info!("Found {} series in {}", series.len(), app.dir.display());

    let options = PartitionOptions {
        epsilon: app.epsilon,
        scope: if app.per_series {
            SeenScope::Group
        } else {
            SeenScope::Call
        },
    };
    let volumes = VolumeLoader::partition_volumes(series, options)?;

    for (id, files) in &volumes {
        println!("{id} ({} files)", files.len());
        for file in files {
            println!("  {}", file.display());
        }

        if let Some(first) = files.first().filter(|_| !app.tags.is_empty()) {
            for (tag, value) in VolumeLoader::read_tags(first, &app.tags)? {
                println!("  {tag} = {value}");
            }
        }
    }

    Ok(())
}
