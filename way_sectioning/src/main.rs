#[macro_use]
extern crate log;

use anyhow::Result;
use structopt::StructOpt;

use abstutil::Timer;
use geom::SlippyTile;
use raw_atlas::RawAtlas;
use way_sectioning::SectioningConfig;

#[derive(StructOpt)]
#[structopt(
    name = "way_sectioning",
    about = "Sections the routable ways of one shard into Atlas edges"
)]
struct Args {
    /// The raw atlas JSON file for one shard
    #[structopt(long)]
    input: String,
    /// A JSON file with sectioning options. Anything missing uses the defaults.
    #[structopt(long)]
    config: Option<String>,
    /// A directory with raw atlas files for neighboring shards, named like `12-654-1583.json`.
    /// Only read when some way leaves the input shard.
    #[structopt(long)]
    neighbors: Option<String>,
    /// Where to write the Atlas JSON
    #[structopt(long)]
    output: String,
    /// Also write edges and nodes as GeoJSON here
    #[structopt(long)]
    geojson: Option<String>,
}

fn main() -> Result<()> {
    abstutil::logger::setup();
    let args = Args::from_args();

    let mut timer = Timer::new(format!("section {}", args.input));
    let raw = RawAtlas::load(&args.input)?;
    let config = match args.config {
        Some(ref path) => SectioningConfig::load(path)?,
        None => SectioningConfig::default(),
    };

    let fetch = |shard: &SlippyTile| {
        let dir = args.neighbors.as_ref()?;
        match abstutil::maybe_read_json::<RawAtlas>(&format!("{}/{}.json", dir, shard)) {
            Ok(x) => x,
            Err(err) => {
                error!("Couldn't load neighbor {}: {}", shard, err);
                None
            }
        }
    };
    let sectioned = way_sectioning::section_raw_atlas(&raw, &config, Some(&fetch), &mut timer)?;

    let atlas = sectioned.into_atlas()?;
    atlas.save(&args.output)?;
    info!("Wrote {}", args.output);
    if let Some(path) = args.geojson {
        fs_err::write(&path, atlas.to_geojson())?;
        info!("Wrote {}", path);
    }
    Ok(())
}
